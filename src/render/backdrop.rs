//! Backdrop compositing.
//!
//! Three layers, bottom to top:
//! - a flat base colour,
//! - a square grid of thin lines drawn at `grid_alpha`, with the whole
//!   layer at `grid_opacity`,
//! - the radial highlight, fading linearly from `highlight_alpha` at the
//!   centre to nothing at `radius * transparent_stop`, blended with the
//!   screen operator.
//!
//! Colours are `[f32; 3]` in `0.0..=1.0`. The same options also produce
//! CSS strings for browser front ends.

use glam::Vec2;

use crate::animation::cursor_field::GradientFrame;
use crate::options::BackdropOptions;

/// RGB colour with channels in `0.0..=1.0`.
pub type Rgb = [f32; 3];

/// Convert 8-bit channels to unit floats.
#[must_use]
pub fn rgb_from_u8(rgb: [u8; 3]) -> Rgb {
    rgb.map(|c| f32::from(c) / 255.0)
}

/// Convert unit floats to 8-bit channels, clamping out-of-range values.
#[must_use]
pub fn rgb_to_u8(rgb: Rgb) -> [u8; 3] {
    rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Screen blend: `1 - (1 - a)(1 - b)` per channel. Never darkens.
#[must_use]
pub fn screen(base: Rgb, top: Rgb) -> Rgb {
    [0, 1, 2].map(|i| 1.0 - (1.0 - base[i]) * (1.0 - top[i]))
}

/// Mix `top` over `base` with coverage `alpha`.
#[must_use]
pub fn over(base: Rgb, top: Rgb, alpha: f32) -> Rgb {
    let alpha = alpha.clamp(0.0, 1.0);
    [0, 1, 2].map(|i| base[i] + (top[i] - base[i]) * alpha)
}

/// Highlight alpha at `point` for the given frame.
#[must_use]
pub fn highlight_alpha(
    frame: &GradientFrame,
    point: Vec2,
    style: &BackdropOptions,
) -> f32 {
    let reach = frame.radius * style.transparent_stop;
    if reach <= 0.0 {
        return 0.0;
    }
    let falloff = 1.0 - point.distance(frame.center) / reach;
    style.highlight_alpha * falloff.max(0.0)
}

/// Whether `[start, end)` overlaps any line `[k * spacing, k * spacing +
/// width)`.
fn span_has_line(start: f32, end: f32, spacing: f32, width: f32) -> bool {
    if spacing <= 0.0 {
        return false;
    }
    let k = (start / spacing).floor();
    let line = k * spacing;
    line + width > start || line + spacing < end
}

/// Grid coverage (0 or 1) for the axis-aligned area `min..max`.
///
/// A sample covers a line when either of its spans crosses one, so a
/// coarse sampler (terminal cells) still shows every line.
#[must_use]
pub fn grid_coverage(min: Vec2, max: Vec2, style: &BackdropOptions) -> f32 {
    let spacing = style.grid_spacing_px;
    let width = style.grid_line_px;
    let hit = span_has_line(min.x, max.x, spacing, width)
        || span_has_line(min.y, max.y, spacing, width);
    if hit {
        1.0
    } else {
        0.0
    }
}

/// Combine the three layers for one sample.
#[must_use]
pub fn composite(grid: f32, highlight: f32, style: &BackdropOptions) -> Rgb {
    let base = rgb_from_u8(style.base_rgb);
    let grid_alpha = style.grid_alpha * style.grid_opacity * grid;
    let with_grid = over(base, rgb_from_u8(style.grid_rgb), grid_alpha);
    let lit = screen(with_grid, rgb_from_u8(style.highlight_rgb));
    over(with_grid, lit, highlight)
}

/// Samples the backdrop for one frame.
#[derive(Debug, Clone, Copy)]
pub struct BackdropSampler<'a> {
    frame: GradientFrame,
    style: &'a BackdropOptions,
}

impl<'a> BackdropSampler<'a> {
    /// Sampler for `frame` drawn with `style`.
    #[must_use]
    pub fn new(frame: GradientFrame, style: &'a BackdropOptions) -> Self {
        Self { frame, style }
    }

    /// Colour of the area `min..max`: grid coverage over the whole area,
    /// highlight evaluated at its centre.
    #[must_use]
    pub fn sample_area(&self, min: Vec2, max: Vec2) -> Rgb {
        let centre = (min + max) * 0.5;
        composite(
            grid_coverage(min, max, self.style),
            highlight_alpha(&self.frame, centre, self.style),
            self.style,
        )
    }

    /// Colour at a single point (no grid antialiasing).
    #[must_use]
    pub fn sample_point(&self, point: Vec2) -> Rgb {
        let line = Vec2::splat(self.style.grid_line_px.max(f32::EPSILON));
        self.sample_area(point, point + line * 0.5)
    }

    /// Frame being sampled.
    #[must_use]
    pub fn frame(&self) -> &GradientFrame {
        &self.frame
    }
}

fn css_rgba(rgb: [u8; 3], alpha: f32) -> String {
    format!("rgba({}, {}, {}, {alpha})", rgb[0], rgb[1], rgb[2])
}

/// CSS `background` value for the highlight layer.
#[must_use]
pub fn gradient_css(frame: &GradientFrame, style: &BackdropOptions) -> String {
    format!(
        "radial-gradient({}px circle at {}px {}px, {}, transparent {}%)",
        frame.radius,
        frame.center.x,
        frame.center.y,
        css_rgba(style.highlight_rgb, style.highlight_alpha),
        style.transparent_stop * 100.0,
    )
}

/// CSS `background-image` and `background-size` for the grid layer.
#[must_use]
pub fn grid_css(style: &BackdropOptions) -> (String, String) {
    let line = css_rgba(style.grid_rgb, style.grid_alpha);
    let width = style.grid_line_px;
    let image = format!(
        "linear-gradient({line} {width}px, transparent {width}px), \
         linear-gradient(90deg, {line} {width}px, transparent {width}px)"
    );
    let spacing = style.grid_spacing_px;
    (image, format!("{spacing}px {spacing}px"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_at(center: Vec2) -> GradientFrame {
        GradientFrame {
            center,
            target: center,
            radius: 600.0,
            viewport: Vec2::new(800.0, 600.0),
            frame: 0,
        }
    }

    fn close(a: Rgb, b: Rgb) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn highlight_fades_to_zero_at_stop() {
        let style = BackdropOptions::default();
        let frame = frame_at(Vec2::ZERO);
        assert_eq!(highlight_alpha(&frame, Vec2::ZERO, &style), 0.25);
        // 40% of 600px.
        let edge = Vec2::new(240.0, 0.0);
        assert!(highlight_alpha(&frame, edge, &style).abs() < 1e-6);
        let half = Vec2::new(0.0, 120.0);
        assert!((highlight_alpha(&frame, half, &style) - 0.125).abs() < 1e-6);
        assert_eq!(highlight_alpha(&frame, Vec2::splat(500.0), &style), 0.0);
    }

    #[test]
    fn screen_never_darkens() {
        let base = [0.2, 0.5, 0.9];
        let out = screen(base, [0.3, 0.0, 1.0]);
        assert!(out.iter().zip(base).all(|(o, b)| *o >= b));
        assert!(close(screen([0.0; 3], [0.4; 3]), [0.4; 3]));
    }

    #[test]
    fn grid_lines_every_spacing() {
        let style = BackdropOptions::default();
        // A 10x20 cell starting on a line column.
        let on_line = grid_coverage(
            Vec2::new(50.0, 5.0),
            Vec2::new(60.0, 25.0),
            &style,
        );
        assert_eq!(on_line, 1.0);
        // A cell that crosses y = 100.
        let crossing = grid_coverage(
            Vec2::new(10.0, 90.0),
            Vec2::new(20.0, 110.0),
            &style,
        );
        assert_eq!(crossing, 1.0);
        let clear = grid_coverage(
            Vec2::new(10.0, 20.0),
            Vec2::new(20.0, 40.0),
            &style,
        );
        assert_eq!(clear, 0.0);
    }

    #[test]
    fn composite_away_from_everything_is_base() {
        let style = BackdropOptions::default();
        assert!(close(composite(0.0, 0.0, &style), [0.0; 3]));
    }

    #[test]
    fn grid_layer_uses_alpha_times_opacity() {
        let style = BackdropOptions::default();
        let expected = 0.12 * 0.6;
        assert!(close(composite(1.0, 0.0, &style), [expected; 3]));
    }

    #[test]
    fn highlight_tints_toward_orange() {
        let style = BackdropOptions::default();
        let lit = composite(0.0, 0.25, &style);
        assert!(lit[0] > lit[1] && lit[1] > lit[2]);
        assert!((lit[0] - 0.25).abs() < 1e-5);
    }

    #[test]
    fn sampler_brightest_under_cursor() {
        let style = BackdropOptions::default();
        let sampler =
            BackdropSampler::new(frame_at(Vec2::new(415.0, 315.0)), &style);
        let near = sampler.sample_point(Vec2::new(415.0, 315.0));
        let far = sampler.sample_point(Vec2::new(715.0, 15.0));
        assert!(near[0] > far[0]);
    }

    #[test]
    fn css_matches_reference_values() {
        let style = BackdropOptions::default();
        let css = gradient_css(&frame_at(Vec2::new(120.5, 80.0)), &style);
        assert_eq!(
            css,
            "radial-gradient(600px circle at 120.5px 80px, \
             rgba(255, 77, 0, 0.25), transparent 40%)"
        );
        let (image, size) = grid_css(&style);
        assert!(image.starts_with(
            "linear-gradient(rgba(255, 255, 255, 0.12) 1px, transparent 1px)"
        ));
        assert_eq!(size, "50px 50px");
    }

    #[test]
    fn u8_conversion_clamps() {
        assert_eq!(rgb_to_u8([1.5, -0.2, 0.5]), [255, 0, 128]);
        assert_eq!(rgb_from_u8([255, 0, 0]), [1.0, 0.0, 0.0]);
    }
}
