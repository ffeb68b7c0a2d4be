//! Frame-driven effects: the pointer highlight and the two text reveals.
//!
//! All three components follow the same lifecycle. `new` builds an idle
//! component, `start` mounts it on a [`Scheduler`](crate::Scheduler), and
//! `stop` (also run on drop) cancels every pending callback.

pub mod cursor_field;
pub mod glyph_reveal;
pub mod interpolation;
pub mod rotator;
pub mod scramble;

pub use cursor_field::{CursorGradientField, FrameSink, GradientFrame};
pub use glyph_reveal::{
    GlyphRevealTask, RevealBatch, RevealPlayback, RevealStep, RevealTuning,
    SlotPhase,
};
pub use rotator::{CrossFadeRotator, RotatorPhase};
pub use scramble::{ScrambleReveal, TextSink};
