use serde::{Deserialize, Serialize};

/// Demo-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// quit = "q"
/// toggle_pause = "p"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Leave the demo.
    Quit,
    /// Stop/resume running frames (frames are dropped while paused).
    TogglePause,
    /// Show frame counter, fps and cursor position.
    ToggleDebug,
    /// Re-run the headline reveal.
    Rescramble,
}
