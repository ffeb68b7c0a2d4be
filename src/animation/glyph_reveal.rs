//! Per-character randomized glyph reveal.
//!
//! A transition from one string to another is split into slots, one per
//! character position of the longer string. Every slot gets its own start
//! and end frame:
//!
//! - before `start_frame` the slot shows its source character,
//! - from `start_frame` until `end_frame` it shows a cached random glyph
//!   that is re-rolled with [`RevealTuning::reroll_chance`] each frame,
//! - from `end_frame` on it shows its target character for good.
//!
//! A missing source or target character (strings of different lengths)
//! renders as nothing. The transition is complete once every slot has
//! resolved, at which point the rendered text equals the target exactly.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GlyphError;
use crate::util::rng::RandomSource;

const ALPHANUMERIC: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const SYMBOLS: &str = "!<>-_\\/[]{}—=+*^?#________";

/// Largest accepted `max_start_delay` and `min_duration`.
pub const MAX_DELAY_FRAMES: u32 = 120;
/// Largest accepted `max_duration`.
pub const MAX_DURATION_FRAMES: u32 = 240;

/// Timing and glyph set of one reveal call site.
///
/// Frame draws are `start = below(max_start_delay)` and
/// `end = start + min_duration + below(max_duration - min_duration)`, so
/// `end > start` whenever `min_duration >= 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(inline)]
#[serde(default)]
pub struct RevealTuning {
    /// Exclusive upper bound of a slot's start frame.
    #[schemars(range(min = 1, max = 120))]
    pub max_start_delay: u32,
    /// Shortest number of scrambling frames per slot.
    #[schemars(range(min = 1, max = 120))]
    pub min_duration: u32,
    /// Exclusive upper bound of scrambling frames per slot.
    #[schemars(range(min = 2, max = 240))]
    pub max_duration: u32,
    /// Probability that an active slot picks a new glyph on a frame.
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub reroll_chance: f32,
    /// Characters used as substitute glyphs.
    pub glyphs: String,
}

impl RevealTuning {
    /// One-shot headline reveal: long stagger, flickering alphanumerics.
    #[must_use]
    pub fn scramble() -> Self {
        Self {
            max_start_delay: 20,
            min_duration: 1,
            max_duration: 20,
            reroll_chance: 0.28,
            glyphs: ALPHANUMERIC.to_owned(),
        }
    }

    /// Cycling text: near-simultaneous start, strobing symbols.
    #[must_use]
    pub fn rotator() -> Self {
        Self {
            max_start_delay: 5,
            min_duration: 15,
            max_duration: 25,
            reroll_chance: 0.5,
            glyphs: SYMBOLS.to_owned(),
        }
    }

    /// Check the documented ranges. `section` names the owner in errors.
    pub fn validate(&self, section: &str) -> Result<(), GlyphError> {
        let fail = |msg: &str| {
            Err(GlyphError::InvalidOptions(format!("{section}: {msg}")))
        };
        if self.glyphs.is_empty() {
            return fail("glyphs must not be empty");
        }
        if !(1..=MAX_DELAY_FRAMES).contains(&self.max_start_delay) {
            return fail("max_start_delay must be within [1, 120]");
        }
        if !(1..=MAX_DELAY_FRAMES).contains(&self.min_duration) {
            return fail("min_duration must be within [1, 120]");
        }
        if self.max_duration <= self.min_duration {
            return fail("max_duration must exceed min_duration");
        }
        if self.max_duration > MAX_DURATION_FRAMES {
            return fail("max_duration must be at most 240");
        }
        if !(0.0..=1.0).contains(&self.reroll_chance) {
            return fail("reroll_chance must be within [0, 1]");
        }
        Ok(())
    }

    /// Upper bound on the frame at which any slot resolves.
    #[must_use]
    pub fn worst_case_frames(&self) -> u32 {
        self.max_start_delay.saturating_sub(1).saturating_add(
            self.max_duration.saturating_sub(1).max(self.min_duration),
        )
    }
}

impl Default for RevealTuning {
    fn default() -> Self {
        Self::scramble()
    }
}

/// Where a slot is in its reveal at a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPhase {
    /// Still showing the source character.
    Pending,
    /// Showing random glyphs.
    Scrambling,
    /// Showing the target character permanently.
    Resolved,
}

/// One character slot of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRevealTask {
    source: Option<char>,
    target: Option<char>,
    start_frame: u32,
    end_frame: u32,
    glyph: Option<char>,
}

impl GlyphRevealTask {
    /// Character shown before the slot starts scrambling.
    #[must_use]
    pub fn source(&self) -> Option<char> {
        self.source
    }

    /// Character shown once resolved.
    #[must_use]
    pub fn target(&self) -> Option<char> {
        self.target
    }

    /// First scrambling frame.
    #[must_use]
    pub fn start_frame(&self) -> u32 {
        self.start_frame
    }

    /// First resolved frame.
    #[must_use]
    pub fn end_frame(&self) -> u32 {
        self.end_frame
    }

    /// Phase at `frame`.
    #[must_use]
    pub fn phase(&self, frame: u32) -> SlotPhase {
        if frame >= self.end_frame {
            SlotPhase::Resolved
        } else if frame >= self.start_frame {
            SlotPhase::Scrambling
        } else {
            SlotPhase::Pending
        }
    }

    fn emit(
        &mut self,
        frame: u32,
        glyphs: &[char],
        reroll_chance: f32,
        rng: &mut dyn RandomSource,
    ) -> Option<char> {
        match self.phase(frame) {
            SlotPhase::Resolved => self.target,
            SlotPhase::Pending => self.source,
            SlotPhase::Scrambling => {
                // The chance roll only happens once a glyph is cached.
                if self.glyph.is_none() || rng.chance(reroll_chance) {
                    let pick = rng.below(glyphs.len() as u32) as usize;
                    self.glyph = glyphs.get(pick).copied();
                }
                self.glyph
            }
        }
    }
}

/// All slots of one transition. Built fresh for every transition.
#[derive(Debug, Clone)]
pub struct RevealBatch {
    tasks: Vec<GlyphRevealTask>,
    glyphs: Vec<char>,
    reroll_chance: f32,
    target: String,
}

impl RevealBatch {
    /// Plan a transition from `from` to `to`.
    ///
    /// Draws each slot's start then duration, slot by slot, from `rng`.
    pub fn new(
        from: &str,
        to: &str,
        tuning: &RevealTuning,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let source: Vec<char> = from.chars().collect();
        let target: Vec<char> = to.chars().collect();
        let slots = source.len().max(target.len());
        let spread = tuning.max_duration.saturating_sub(tuning.min_duration);

        let tasks = (0..slots)
            .map(|i| {
                let start_frame = rng.below(tuning.max_start_delay);
                let extra =
                    tuning.min_duration.saturating_add(rng.below(spread));
                GlyphRevealTask {
                    source: source.get(i).copied(),
                    target: target.get(i).copied(),
                    start_frame,
                    end_frame: start_frame.saturating_add(extra),
                    glyph: None,
                }
            })
            .collect();

        Self {
            tasks,
            glyphs: tuning.glyphs.chars().collect(),
            reroll_chance: tuning.reroll_chance,
            target: to.to_owned(),
        }
    }

    /// Render the text for `frame`, updating cached glyphs.
    pub fn render(&mut self, frame: u32, rng: &mut dyn RandomSource) -> String {
        let mut out = String::with_capacity(self.target.len());
        for task in &mut self.tasks {
            if let Some(ch) =
                task.emit(frame, &self.glyphs, self.reroll_chance, rng)
            {
                out.push(ch);
            }
        }
        out
    }

    /// Whether every slot has resolved at `frame`.
    #[must_use]
    pub fn is_complete(&self, frame: u32) -> bool {
        self.tasks.iter().all(|t| frame >= t.end_frame)
    }

    /// Frame at which the whole batch is resolved.
    #[must_use]
    pub fn completion_frame(&self) -> u32 {
        self.tasks.iter().map(|t| t.end_frame).max().unwrap_or(0)
    }

    /// Planned slots.
    #[must_use]
    pub fn tasks(&self) -> &[GlyphRevealTask] {
        &self.tasks
    }

    /// Text the batch resolves to.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether `ch` belongs to this batch's glyph alphabet.
    #[must_use]
    pub fn is_glyph(&self, ch: char) -> bool {
        self.glyphs.contains(&ch)
    }
}

/// Output of one playback step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealStep {
    /// Text to display for this frame.
    pub text: String,
    /// Whether the transition finished on this frame.
    pub complete: bool,
}

/// Frame counter plus batch: the state one running reveal needs.
///
/// The first [`step`](Self::step) renders frame 0. Once a step reports
/// `complete`, its text is exactly the target and further steps keep
/// returning it.
#[derive(Debug, Clone)]
pub struct RevealPlayback {
    batch: RevealBatch,
    frame: u32,
}

impl RevealPlayback {
    /// Start playing `batch` from frame 0.
    #[must_use]
    pub fn new(batch: RevealBatch) -> Self {
        Self { batch, frame: 0 }
    }

    /// Render the current frame and advance the counter.
    pub fn step(&mut self, rng: &mut dyn RandomSource) -> RevealStep {
        if self.batch.is_complete(self.frame) {
            return RevealStep {
                text: self.batch.target.clone(),
                complete: true,
            };
        }
        let text = self.batch.render(self.frame, rng);
        self.frame += 1;
        RevealStep {
            text,
            complete: false,
        }
    }

    /// Next frame to render.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Batch being played.
    #[must_use]
    pub fn batch(&self) -> &RevealBatch {
        &self.batch
    }
}
