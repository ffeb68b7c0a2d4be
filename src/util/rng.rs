//! Injectable randomness for the glyph reveal.
//!
//! The reveal draws every random value through [`RandomSource`] so tests
//! can pin the sequence. Production code uses [`ThreadRandom`]; demos that
//! want repeatable output use [`SeededRandom`]; tests use [`FixedRandom`].

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of uniform values in `[0, 1)`.
///
/// Integer draws follow `floor(unit * bound)`, so a fixed sequence of unit
/// values maps to predictable frame numbers and glyph indices.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        let scaled = (self.next_unit() * bound as f32) as u32;
        scaled.min(bound - 1)
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }
}

/// Thread-local OS-seeded generator.
pub struct ThreadRandom(ThreadRng);

impl ThreadRandom {
    /// Generator backed by `rand::rng()`.
    #[must_use]
    pub fn new() -> Self {
        Self(rand::rng())
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Deterministic generator for reproducible runs.
pub struct SeededRandom(StdRng);

impl SeededRandom {
    /// Generator seeded from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Replays a fixed list of unit values, wrapping around at the end.
///
/// An empty list always yields 0.0.
#[derive(Debug, Clone)]
pub struct FixedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl FixedRandom {
    /// Replay `values` in order. Values are clamped into `[0, 1)`.
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 0.999_999))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Always return the same value.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Boxed source as stored by the animation components.
pub type BoxedRandom = Box<dyn RandomSource>;
