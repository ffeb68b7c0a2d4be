// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Cursor-tracking backdrop and glyph-reveal text animation engine.
//!
//! glyphfx drives three small real-time effects from an explicit frame
//! scheduler:
//!
//! - [`animation::CursorGradientField`] - a radial highlight that follows
//!   the pointer with exponential smoothing, composited over a grid.
//! - [`animation::ScrambleReveal`] - reveals one string through randomized
//!   glyphs that lock in at staggered frames.
//! - [`animation::CrossFadeRotator`] - cycles an ordered list of strings,
//!   pausing on each and transitioning with the same glyph reveal.
//!
//! # Key entry points
//!
//! - [`scheduler::Scheduler`] - request/cancel per-frame ticks and timers;
//!   [`scheduler::FrameScheduler`] is the deterministic native driver
//! - [`input::PointerSource`] - injectable pointer stream
//! - [`util::rng::RandomSource`] - injectable randomness for the reveal
//! - [`options::Options`] - TOML presets for every tunable
//! - [`render::backdrop`] - pure backdrop compositing
//!
//! # Architecture
//!
//! Everything runs on one thread. Each component owns its state behind an
//! `Rc<RefCell<_>>`; scheduled callbacks hold only weak references and
//! every scheduling call returns a [`scheduler::CancelHandle`] that the
//! component cancels on `stop()` and before any restart, so a superseded
//! frame loop can never write to the displayed output.

pub mod animation;
pub mod error;
pub mod input;
pub mod options;
pub mod render;
pub mod scheduler;
pub mod util;
#[cfg(feature = "web")]
pub mod web;

pub use animation::{CrossFadeRotator, CursorGradientField, ScrambleReveal};
pub use error::GlyphError;
pub use options::Options;
pub use scheduler::{CancelHandle, FrameScheduler, Scheduler};
