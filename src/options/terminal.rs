use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Terminal demo front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Terminal", inline)]
#[serde(default)]
pub struct TerminalOptions {
    /// Target frames per second.
    #[schemars(title = "FPS", range(min = 1, max = 240))]
    pub fps: u32,
    /// Width of one terminal cell in virtual pixels.
    #[schemars(skip)]
    pub cell_width_px: f32,
    /// Height of one terminal cell in virtual pixels.
    #[schemars(skip)]
    pub cell_height_px: f32,
    /// Text revealed by the headline scramble.
    #[schemars(title = "Headline")]
    pub headline: String,
    /// Show the frame/cursor debug line on startup.
    #[schemars(title = "Show Debug")]
    pub show_debug: bool,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            cell_width_px: 10.0,
            cell_height_px: 20.0,
            headline: "Dynamic Background".to_owned(),
            show_debug: false,
        }
    }
}
