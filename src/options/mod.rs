//! Centralized effect options with TOML preset support.
//!
//! All tweakable settings (backdrop, both text reveals, the terminal front
//! end and its keybindings) are consolidated here. Options serialize
//! to/from TOML so presets can live next to the binary.

mod backdrop;
mod keybindings;
mod terminal;
mod text;

use std::path::Path;

pub use backdrop::BackdropOptions;
pub use keybindings::KeybindingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use terminal::TerminalOptions;
pub use text::{RotatorOptions, ScrambleOptions};

use crate::error::GlyphError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[rotator]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Pointer highlight and grid.
    pub backdrop: BackdropOptions,
    /// Headline scramble.
    pub scramble: ScrambleOptions,
    /// Cycling text.
    pub rotator: RotatorOptions,
    /// Terminal front end.
    pub terminal: TerminalOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, GlyphError> {
        let mut opts: Self = toml::from_str(content)
            .map_err(|e| GlyphError::OptionsParse(e.to_string()))?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Load options from a TOML file and validate them.
    pub fn load(path: &Path) -> Result<Self, GlyphError> {
        let content = std::fs::read_to_string(path).map_err(GlyphError::Io)?;
        let opts = Self::from_toml(&content)?;
        opts.validate()?;
        log::info!("loaded options from {}", path.display());
        Ok(opts)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), GlyphError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlyphError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GlyphError::Io)?;
        }
        std::fs::write(path, content).map_err(GlyphError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Check every documented range. Returns the first violation.
    pub fn validate(&self) -> Result<(), GlyphError> {
        let invalid = |msg: String| Err(GlyphError::InvalidOptions(msg));

        let backdrop = &self.backdrop;
        if !(backdrop.smoothing > 0.0 && backdrop.smoothing <= 1.0) {
            return invalid(format!(
                "backdrop.smoothing must be in (0, 1], got {}",
                backdrop.smoothing
            ));
        }
        if backdrop.radius_px <= 0.0 {
            return invalid(format!(
                "backdrop.radius_px must be positive, got {}",
                backdrop.radius_px
            ));
        }
        if !(backdrop.transparent_stop > 0.0
            && backdrop.transparent_stop <= 1.0)
        {
            return invalid(format!(
                "backdrop.transparent_stop must be in (0, 1], got {}",
                backdrop.transparent_stop
            ));
        }
        if backdrop.grid_spacing_px < 1.0 {
            return invalid(format!(
                "backdrop.grid_spacing_px must be at least 1, got {}",
                backdrop.grid_spacing_px
            ));
        }

        if !(self.scramble.speed > 0.0 && self.scramble.speed.is_finite()) {
            return invalid(format!(
                "scramble.speed must be positive, got {}",
                self.scramble.speed
            ));
        }
        self.scramble.reveal.validate("scramble.reveal")?;

        if self.rotator.texts.is_empty() {
            return invalid("rotator.texts is empty".to_owned());
        }
        if self.rotator.interval_ms == 0 {
            return invalid("rotator.interval_ms must be positive".to_owned());
        }
        self.rotator.reveal.validate("rotator.reveal")?;

        let terminal = &self.terminal;
        if terminal.fps == 0 {
            return invalid("terminal.fps must be at least 1".to_owned());
        }
        if terminal.cell_width_px < 1.0 || terminal.cell_height_px < 1.0 {
            return invalid(format!(
                "terminal cell size must be at least 1x1, got {}x{}",
                terminal.cell_width_px, terminal.cell_height_px
            ));
        }
        Ok(())
    }
}
