//! Shared utilities: injectable randomness and frame pacing.

pub mod frame_timing;
pub mod rng;
