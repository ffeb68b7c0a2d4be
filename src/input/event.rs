/// Platform-agnostic input events.
///
/// Front ends translate their native events into these before handing them
/// to the demo loop; pointer motion is additionally fanned out through a
/// [`PointerHub`](super::PointerHub).
///
/// # Example
///
/// ```ignore
/// match InputEvent::CursorMoved { x: 100.0, y: 200.0 } {
///     InputEvent::CursorMoved { x, y } => hub.dispatch(Vec2::new(x, y)),
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute viewport position.
    CursorMoved {
        /// Horizontal position in viewport pixels.
        x: f32,
        /// Vertical position in viewport pixels.
        y: f32,
    },
    /// Viewport size changed.
    Resized {
        /// New width in viewport pixels.
        width: f32,
        /// New height in viewport pixels.
        height: f32,
    },
    /// A key was pressed, identified by its binding string
    /// (e.g. `"q"`, `"Esc"`).
    Key(String),
}

impl InputEvent {
    /// Cursor position carried by the event, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<glam::Vec2> {
        match self {
            Self::CursorMoved { x, y } => Some(glam::Vec2::new(*x, *y)),
            _ => None,
        }
    }
}
