//! Injectable pointer streams.
//!
//! [`PointerSource`] abstracts "tell me whenever the pointer moves". The
//! browser binding implements it over `mousemove`; native front ends and
//! tests use [`PointerHub`] and push coordinates into it directly.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use glam::Vec2;
use rustc_hash::FxHashMap;

/// Handler invoked with the pointer position in viewport pixels.
pub type MoveHandler = Box<dyn FnMut(Vec2)>;

/// A stream of pointer positions.
pub trait PointerSource {
    /// Register `handler` for every subsequent move.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// unsubscribed or dropped.
    fn on_move(&self, handler: MoveHandler) -> Subscription;
}

/// Keeps a pointer handler registered.
///
/// Dropping the subscription unsubscribes; [`unsubscribe`](Self::unsubscribe)
/// does it early and may be called any number of times.
#[must_use = "dropping a Subscription unsubscribes the handler"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Subscription that runs `unsubscribe` exactly once.
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Subscription with nothing to release.
    pub fn detached() -> Self {
        Self { unsubscribe: None }
    }

    /// Remove the handler. Safe to call repeatedly.
    pub fn unsubscribe(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    /// Whether the handler is still registered through this subscription.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.unsubscribe.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

// A slot is `None` while its handler is being run by `dispatch`.
type HandlerSlots = FxHashMap<u64, Option<MoveHandler>>;

/// In-process pointer source fed by [`dispatch`](Self::dispatch).
///
/// Handlers may unsubscribe (themselves or others) while being dispatched
/// to; a handler removed mid-dispatch is not called again.
#[derive(Default)]
pub struct PointerHub {
    handlers: Rc<RefCell<HandlerSlots>>,
    next_id: Cell<u64>,
    last: Cell<Option<Vec2>>,
}

impl PointerHub {
    /// Hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a pointer position to every live handler.
    pub fn dispatch(&self, position: Vec2) {
        self.last.set(Some(position));

        let mut ids: Vec<u64> =
            self.handlers.borrow().keys().copied().collect();
        ids.sort_unstable();

        for id in ids {
            let taken = self
                .handlers
                .borrow_mut()
                .get_mut(&id)
                .and_then(Option::take);
            let Some(mut handler) = taken else {
                continue;
            };
            handler(position);
            // Put it back unless it was unsubscribed while running.
            if let Some(slot) = self.handlers.borrow_mut().get_mut(&id) {
                *slot = Some(handler);
            }
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Most recently dispatched position.
    #[must_use]
    pub fn last_position(&self) -> Option<Vec2> {
        self.last.get()
    }
}

impl PointerSource for PointerHub {
    fn on_move(&self, handler: MoveHandler) -> Subscription {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let _ = self.handlers.borrow_mut().insert(id, Some(handler));

        let handlers: Weak<RefCell<HandlerSlots>> =
            Rc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(handlers) = handlers.upgrade() {
                let _ = handlers.borrow_mut().remove(&id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<Vec2>>>, MoveHandler) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, Box::new(move |p| sink.borrow_mut().push(p)))
    }

    #[test]
    fn dispatch_reaches_subscribers() {
        let hub = PointerHub::new();
        let (seen, handler) = recorder();
        let _sub = hub.on_move(handler);

        hub.dispatch(Vec2::new(1.0, 2.0));
        hub.dispatch(Vec2::new(3.0, 4.0));

        assert_eq!(
            *seen.borrow(),
            vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]
        );
        assert_eq!(hub.last_position(), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let hub = PointerHub::new();
        let (seen, handler) = recorder();
        let mut sub = hub.on_move(handler);

        sub.unsubscribe();
        sub.unsubscribe();
        hub.dispatch(Vec2::ONE);

        assert!(seen.borrow().is_empty());
        assert!(!sub.is_active());
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let hub = PointerHub::new();
        let (seen, handler) = recorder();
        drop(hub.on_move(handler));
        hub.dispatch(Vec2::ONE);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn handler_may_unsubscribe_itself_during_dispatch() {
        let hub = PointerHub::new();
        let slot: Rc<RefCell<Option<Subscription>>> =
            Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let own = Rc::clone(&slot);
        let count = Rc::clone(&calls);
        let sub = hub.on_move(Box::new(move |_| {
            count.set(count.get() + 1);
            if let Some(mut sub) = own.borrow_mut().take() {
                sub.unsubscribe();
            }
        }));
        *slot.borrow_mut() = Some(sub);

        hub.dispatch(Vec2::ZERO);
        hub.dispatch(Vec2::ZERO);

        assert_eq!(calls.get(), 1);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let (_, handler) = recorder();
        let mut sub = {
            let hub = PointerHub::new();
            hub.on_move(handler)
        };
        sub.unsubscribe();
    }
}
