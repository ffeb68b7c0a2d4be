//! Terminal front end: the backdrop as cell background colours with the
//! text effects drawn on top.
//!
//! Terminal cells are treated as `cell_width_px x cell_height_px` virtual
//! pixels so the backdrop keeps its pixel-based tuning (600px highlight,
//! 50px grid) at a sensible scale.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{
    Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use glam::Vec2;

use crate::animation::cursor_field::GradientFrame;
use crate::error::GlyphError;
use crate::options::{BackdropOptions, TerminalOptions};
use crate::render::backdrop::{rgb_to_u8, BackdropSampler};

const TEXT_RGB: [u8; 3] = [255, 255, 255];
const DIM_RGB: [u8; 3] = [150, 150, 150];

/// Raw-mode, alternate-screen session. Restores the terminal on drop.
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    /// Enter raw mode, switch to the alternate screen, capture the mouse
    /// and hide the cursor.
    pub fn enter() -> Result<Self, GlyphError> {
        enable_raw_mode()?;
        let session = Self { active: true };
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide
        )?;
        Ok(session)
    }

    /// Current terminal size in cells.
    pub fn size() -> Result<(u16, u16), GlyphError> {
        Ok(terminal::size()?)
    }

    /// Restore the terminal. Idempotent.
    pub fn leave(&mut self) -> Result<(), GlyphError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            io::stdout(),
            ResetColor,
            Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            log::error!("failed to restore terminal: {e}");
        }
    }
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Character drawn in the cell.
    pub ch: char,
    /// Foreground colour.
    pub fg: [u8; 3],
    /// Background colour.
    pub bg: [u8; 3],
}

/// Text drawn over the backdrop.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    /// Headline, centred just above the middle row.
    pub headline: String,
    /// Rotating line, centred just below the middle row.
    pub rotator: String,
    /// Top-left status line, when debugging.
    pub debug: Option<String>,
    /// Whether to show the paused indicator.
    pub paused: bool,
}

/// Maps a cell grid to virtual pixels and lays out frames.
#[derive(Debug, Clone)]
pub struct TerminalCanvas {
    cols: u16,
    rows: u16,
    cell: Vec2,
}

impl TerminalCanvas {
    /// Canvas of `cols x rows` cells sized per `options`.
    #[must_use]
    pub fn new(cols: u16, rows: u16, options: &TerminalOptions) -> Self {
        Self {
            cols,
            rows,
            cell: Vec2::new(options.cell_width_px, options.cell_height_px),
        }
    }

    /// Track a terminal resize.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Size in cells.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Viewport size in virtual pixels.
    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(f32::from(self.cols), f32::from(self.rows)) * self.cell
    }

    /// Virtual-pixel position of a cell's centre (pointer events).
    #[must_use]
    pub fn cell_center(&self, col: u16, row: u16) -> Vec2 {
        (Vec2::new(f32::from(col), f32::from(row)) + 0.5) * self.cell
    }

    /// Lay out one frame: backdrop colours plus overlay text.
    #[must_use]
    pub fn compose(
        &self,
        frame: &GradientFrame,
        style: &BackdropOptions,
        overlay: &Overlay,
    ) -> Vec<Vec<Cell>> {
        let sampler = BackdropSampler::new(*frame, style);
        let mut grid: Vec<Vec<Cell>> = (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| {
                        let min = Vec2::new(f32::from(col), f32::from(row))
                            * self.cell;
                        let area = sampler.sample_area(min, min + self.cell);
                        let bg = rgb_to_u8(area);
                        Cell {
                            ch: ' ',
                            fg: TEXT_RGB,
                            bg,
                        }
                    })
                    .collect()
            })
            .collect();

        let middle = self.rows / 2;
        put_centered(
            &mut grid,
            middle.saturating_sub(1),
            &overlay.headline,
            TEXT_RGB,
        );
        put_centered(
            &mut grid,
            middle.saturating_add(1),
            &overlay.rotator,
            style.highlight_rgb,
        );
        if let Some(debug) = &overlay.debug {
            put_text(&mut grid, 0, 0, debug, DIM_RGB);
        }
        if overlay.paused {
            let last = self.rows.saturating_sub(1);
            put_text(&mut grid, last, 0, "Paused", DIM_RGB);
        }
        grid
    }

    /// Write a composed frame, changing colours only where they differ.
    /// Cells outside the current size (a frame composed before a resize)
    /// are skipped.
    pub fn draw(
        &self,
        out: &mut impl Write,
        cells: &[Vec<Cell>],
    ) -> io::Result<()> {
        let visible = cells.iter().take(usize::from(self.rows));
        for (row, line) in visible.enumerate() {
            queue!(out, MoveTo(0, row as u16))?;
            let mut colours = None;
            for cell in line.iter().take(usize::from(self.cols)) {
                if colours != Some((cell.fg, cell.bg)) {
                    queue!(
                        out,
                        SetForegroundColor(rgb(cell.fg)),
                        SetBackgroundColor(rgb(cell.bg))
                    )?;
                    colours = Some((cell.fg, cell.bg));
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
    }
}

fn put_text(
    grid: &mut [Vec<Cell>],
    row: u16,
    col: u16,
    text: &str,
    fg: [u8; 3],
) {
    let Some(line) = grid.get_mut(usize::from(row)) else {
        return;
    };
    let cells = line.iter_mut().skip(usize::from(col));
    for (cell, ch) in cells.zip(text.chars()) {
        cell.ch = ch;
        cell.fg = fg;
    }
}

fn put_centered(grid: &mut [Vec<Cell>], row: u16, text: &str, fg: [u8; 3]) {
    let width = grid.first().map_or(0, Vec::len);
    let len = text.chars().count();
    let col = width.saturating_sub(len) / 2;
    put_text(grid, row, col as u16, text, fg);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> TerminalCanvas {
        TerminalCanvas::new(80, 24, &TerminalOptions::default())
    }

    fn frame(canvas: &TerminalCanvas, center: Vec2) -> GradientFrame {
        GradientFrame {
            center,
            target: center,
            radius: 600.0,
            viewport: canvas.viewport(),
            frame: 1,
        }
    }

    fn row_text(cells: &[Vec<Cell>], row: usize) -> String {
        cells[row].iter().map(|c| c.ch).collect()
    }

    #[test]
    fn viewport_in_virtual_pixels() {
        let canvas = canvas();
        assert_eq!(canvas.viewport(), Vec2::new(800.0, 480.0));
        assert_eq!(canvas.cell_center(0, 0), Vec2::new(5.0, 10.0));
    }

    #[test]
    fn overlay_text_is_centered() {
        let canvas = canvas();
        let overlay = Overlay {
            headline: "Dynamic Background".to_owned(),
            rotator: "Robots.".to_owned(),
            ..Overlay::default()
        };
        let style = BackdropOptions::default();
        let cells = canvas.compose(
            &frame(&canvas, Vec2::new(400.0, 240.0)),
            &style,
            &overlay,
        );

        assert_eq!(cells.len(), 24);
        assert_eq!(row_text(&cells, 11).trim(), "Dynamic Background");
        assert_eq!(row_text(&cells, 11).find('D'), Some(31));
        assert_eq!(row_text(&cells, 13).trim(), "Robots.");
        assert_eq!(cells[13][36].fg, style.highlight_rgb);
    }

    #[test]
    fn highlight_follows_frame_center() {
        let canvas = canvas();
        let style = BackdropOptions::default();
        let overlay = Overlay::default();
        let cells = canvas.compose(
            &frame(&canvas, canvas.cell_center(10, 5)),
            &style,
            &overlay,
        );
        // Row 5 / col 10 sits under the cursor, far corner does not.
        assert!(cells[5][12].bg[0] > cells[23][79].bg[0]);
    }

    #[test]
    fn debug_and_pause_lines() {
        let canvas = canvas();
        let overlay = Overlay {
            debug: Some("frame 3".to_owned()),
            paused: true,
            ..Overlay::default()
        };
        let cells = canvas.compose(
            &frame(&canvas, Vec2::ZERO),
            &BackdropOptions::default(),
            &overlay,
        );
        assert!(row_text(&cells, 0).starts_with("frame 3"));
        assert!(row_text(&cells, 23).starts_with("Paused"));
    }

    #[test]
    fn draw_writes_every_cell() {
        let canvas = TerminalCanvas::new(4, 2, &TerminalOptions::default());
        let cells = canvas.compose(
            &frame(&canvas, Vec2::ZERO),
            &BackdropOptions::default(),
            &Overlay::default(),
        );
        let mut out = Vec::new();
        canvas.draw(&mut out, &cells).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert_eq!(written.matches(' ').count(), 8);
    }
}
