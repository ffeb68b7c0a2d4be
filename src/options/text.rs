use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::animation::glyph_reveal::RevealTuning;

/// Single-shot headline reveal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scramble", inline)]
#[serde(default)]
pub struct ScrambleOptions {
    /// Reveal frames advanced per scheduler tick.
    #[schemars(title = "Speed", range(min = 0.1, max = 4.0), extend("step" = 0.1))]
    pub speed: f32,
    /// Frame draws and glyph set.
    pub reveal: RevealTuning,
}

impl Default for ScrambleOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            reveal: RevealTuning::scramble(),
        }
    }
}

/// Cycling text list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Rotator", inline)]
#[serde(default)]
pub struct RotatorOptions {
    /// Entries in display order.
    #[schemars(skip)]
    pub texts: Vec<String>,
    /// Pause on each entry, in milliseconds.
    #[schemars(title = "Interval (ms)", range(min = 100, max = 20000), extend("step" = 100))]
    pub interval_ms: u64,
    /// Frame draws and glyph set.
    pub reveal: RevealTuning,
}

impl RotatorOptions {
    /// Pause on each entry.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RotatorOptions {
    fn default() -> Self {
        Self {
            texts: [
                "Machine economy.",
                "Robots.",
                "Staking.",
                "Build.",
                "AI Agents.",
                "x402.",
            ]
            .map(str::to_owned)
            .to_vec(),
            interval_ms: 2000,
            reveal: RevealTuning::rotator(),
        }
    }
}
