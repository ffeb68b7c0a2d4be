//! Turning animation state into pixels: the pure backdrop model and the
//! terminal front end built on it.

pub mod backdrop;
#[cfg(feature = "terminal")]
pub mod terminal;

pub use backdrop::{BackdropSampler, Rgb};
