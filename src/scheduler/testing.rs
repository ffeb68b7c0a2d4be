//! Scheduler wrapper that records every request and cancellation.

use std::cell::RefCell;

use web_time::Duration;

use super::{
    CancelHandle, FrameScheduler, Scheduler, TickCallback, TimerCallback,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    Requested(CancelHandle),
    Cancelled(CancelHandle),
}

pub(crate) const FRAME: Duration = Duration::from_millis(16);

#[derive(Default)]
pub(crate) struct RecordingScheduler {
    pub(crate) inner: FrameScheduler,
    events: RefCell<Vec<Event>>,
}

impl RecordingScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub(crate) fn advance(&self, dt: Duration) {
        self.inner.advance(dt);
    }

    pub(crate) fn frames(&self, count: u32) {
        self.inner.advance_frames(count, FRAME);
    }

    pub(crate) fn pending_ticks(&self) -> usize {
        self.inner.pending_ticks()
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.inner.pending_timers()
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.inner.is_idle()
    }

    /// Every cancellation happens before the next request that follows it
    /// in `events`, and the handle it cancels was requested earlier.
    pub(crate) fn cancelled_before_requested(&self, old: CancelHandle) -> bool {
        let events = self.events();
        let cancel = events.iter().position(|e| *e == Event::Cancelled(old));
        let request = events.iter().position(|e| {
            matches!(e, Event::Requested(h) if h.id() > old.id())
        });
        match (cancel, request) {
            (Some(c), Some(r)) => c < r,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl Scheduler for RecordingScheduler {
    fn request_tick(&self, callback: TickCallback) -> CancelHandle {
        let handle = self.inner.request_tick(callback);
        self.events.borrow_mut().push(Event::Requested(handle));
        handle
    }

    fn set_timeout(
        &self,
        delay: Duration,
        callback: TimerCallback,
    ) -> CancelHandle {
        let handle = self.inner.set_timeout(delay, callback);
        self.events.borrow_mut().push(Event::Requested(handle));
        handle
    }

    fn cancel(&self, handle: CancelHandle) {
        self.events.borrow_mut().push(Event::Cancelled(handle));
        self.inner.cancel(handle);
    }
}
