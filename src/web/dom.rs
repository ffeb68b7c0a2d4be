//! DOM event listeners as [`Subscription`]s.

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, MouseEvent};

use crate::error::GlyphError;
use crate::input::{MoveHandler, PointerSource, Subscription};
use crate::web::{web_error, window};

/// Register `handler` for `kind` events on `target`. The listener is
/// removed (and its closure freed) when the subscription ends.
pub fn listen(
    target: &EventTarget,
    kind: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Subscription, GlyphError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
    target
        .add_event_listener_with_callback(kind, callback)
        .map_err(|e| web_error(kind, &e))?;
    let target = target.clone();
    Ok(Subscription::new(move || {
        if let Err(e) = target.remove_event_listener_with_callback(
            kind,
            closure.as_ref().unchecked_ref(),
        ) {
            log::error!("{}", web_error(kind, &e));
        }
    }))
}

/// `mousemove` on the window, in client (viewport) pixels.
pub struct DomPointerSource {
    target: EventTarget,
}

impl DomPointerSource {
    /// Pointer source for the global window.
    pub fn window() -> Result<Self, GlyphError> {
        Ok(Self {
            target: window()?.into(),
        })
    }
}

impl PointerSource for DomPointerSource {
    fn on_move(&self, mut handler: MoveHandler) -> Subscription {
        let listener = listen(&self.target, "mousemove", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                handler(Vec2::new(
                    mouse.client_x() as f32,
                    mouse.client_y() as f32,
                ));
            }
        });
        listener.unwrap_or_else(|e| {
            log::error!("{e}");
            Subscription::detached()
        })
    }
}
