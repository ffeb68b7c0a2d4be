//! Browser front end (feature `web`).
//!
//! [`RafScheduler`] and [`DomPointerSource`] implement the scheduling and
//! pointer seams on top of `requestAnimationFrame`, `setTimeout` and
//! `mousemove`. The `mount*` functions exported to JavaScript wire the
//! three components to DOM elements and return handles whose `dispose()`
//! (or `free()`) cancels everything they scheduled.

mod dom;
mod mount;
mod raf;

pub use dom::{listen, DomPointerSource};
pub use mount::{
    mount_background, mount_rotator, mount_scramble, BackgroundHandle,
    RotatorHandle, ScrambleHandle,
};
pub use raf::RafScheduler;
use wasm_bindgen::prelude::*;

use crate::error::GlyphError;

impl From<GlyphError> for JsValue {
    fn from(e: GlyphError) -> Self {
        Self::from_str(&e.to_string())
    }
}

/// Install the console logger and panic hook. Runs when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("glyphfx {} loaded", env!("CARGO_PKG_VERSION"));
}

/// Format a JavaScript exception for [`GlyphError::Web`].
pub(crate) fn web_error(context: &str, err: &JsValue) -> GlyphError {
    GlyphError::Web(format!("{context}: {err:?}"))
}

/// The global `window`.
pub(crate) fn window() -> Result<web_sys::Window, GlyphError> {
    web_sys::window().ok_or_else(|| GlyphError::Web("no global window".into()))
}
