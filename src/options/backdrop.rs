use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pointer highlight and grid backdrop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Backdrop", inline)]
#[serde(default)]
pub struct BackdropOptions {
    /// Fraction of the remaining distance the highlight covers per frame.
    #[schemars(title = "Smoothing", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub smoothing: f32,
    /// Gradient radius in pixels.
    #[schemars(title = "Radius", range(min = 50.0, max = 2000.0), extend("step" = 10.0))]
    pub radius_px: f32,
    /// Fraction of the radius at which the highlight fades out.
    #[schemars(title = "Falloff", range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub transparent_stop: f32,
    /// Highlight colour.
    #[schemars(skip)]
    pub highlight_rgb: [u8; 3],
    /// Highlight alpha at the centre.
    #[schemars(title = "Highlight Alpha", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub highlight_alpha: f32,
    /// Grid cell size in pixels.
    #[schemars(title = "Grid Spacing", range(min = 4.0, max = 400.0), extend("step" = 1.0))]
    pub grid_spacing_px: f32,
    /// Grid line thickness in pixels.
    #[schemars(skip)]
    pub grid_line_px: f32,
    /// Grid line colour.
    #[schemars(skip)]
    pub grid_rgb: [u8; 3],
    /// Grid line alpha.
    #[schemars(title = "Grid Alpha", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub grid_alpha: f32,
    /// Opacity of the whole grid layer.
    #[schemars(title = "Grid Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub grid_opacity: f32,
    /// Background colour under everything.
    #[schemars(skip)]
    pub base_rgb: [u8; 3],
}

impl Default for BackdropOptions {
    fn default() -> Self {
        Self {
            smoothing: 0.15,
            radius_px: 600.0,
            transparent_stop: 0.4,
            highlight_rgb: [255, 77, 0],
            highlight_alpha: 0.25,
            grid_spacing_px: 50.0,
            grid_line_px: 1.0,
            grid_rgb: [255, 255, 255],
            grid_alpha: 0.12,
            grid_opacity: 0.6,
            base_rgb: [0, 0, 0],
        }
    }
}
