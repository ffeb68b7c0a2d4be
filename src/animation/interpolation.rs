//! Exponential smoothing toward a moving target.

use glam::Vec2;

/// Move `current` a fixed fraction of the remaining distance to `target`.
///
/// Applied once per frame this is exponential decay: after `n` frames the
/// remaining distance is `(1 - factor)^n` of the original. For `factor` in
/// `(0, 1]` the result never overshoots the target.
#[inline]
#[must_use]
pub fn lerp_toward(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    current + (target - current) * factor
}

/// Frames needed for a gap of `distance` to shrink below `epsilon`.
///
/// Returns 0 when the gap is already below `epsilon`, and `u32::MAX` when
/// `factor` cannot make progress (outside `(0, 1)`, except that a factor of
/// exactly 1 closes any gap in one frame).
#[must_use]
pub fn frames_to_within(distance: f32, epsilon: f32, factor: f32) -> u32 {
    if distance < epsilon {
        return 0;
    }
    if factor >= 1.0 {
        return 1;
    }
    if factor <= 0.0 || epsilon <= 0.0 {
        return u32::MAX;
    }
    let frames = ((epsilon / distance).ln() / (1.0 - factor).ln()).ceil();
    frames.max(1.0) as u32
}

/// A 2D position eased toward a target every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedPoint {
    current: Vec2,
    target: Vec2,
    factor: f32,
}

impl SmoothedPoint {
    /// Point resting at `position` with smoothing `factor`.
    #[must_use]
    pub fn new(position: Vec2, factor: f32) -> Self {
        Self {
            current: position,
            target: position,
            factor,
        }
    }

    /// Change where the point is heading. Does not move it.
    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Apply one frame of smoothing and return the new position.
    pub fn step(&mut self) -> Vec2 {
        self.current = lerp_toward(self.current, self.target, self.factor);
        self.current
    }

    /// Interpolated position.
    #[must_use]
    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// Position being approached.
    #[must_use]
    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Remaining distance to the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.current.distance(self.target)
    }

    /// Smoothing factor.
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.factor
    }
}
