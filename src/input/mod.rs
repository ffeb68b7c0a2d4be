//! Input handling: platform-agnostic events, the injectable pointer stream
//! and key actions for interactive front ends.

/// Platform-agnostic input events.
pub mod event;
/// Key actions and their string bindings.
pub mod keyboard;
/// Pointer streams and subscriptions.
pub mod pointer;

pub use event::InputEvent;
pub use keyboard::KeyAction;
pub use pointer::{MoveHandler, PointerHub, PointerSource, Subscription};
