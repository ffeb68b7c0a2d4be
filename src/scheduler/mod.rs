//! Frame and timer scheduling.
//!
//! Components never loop on their own. They ask a [`Scheduler`] for the
//! next display refresh ([`Scheduler::request_tick`]) or for a delayed
//! callback ([`Scheduler::set_timeout`]) and keep the returned
//! [`CancelHandle`] until the callback fires or is cancelled.
//!
//! Tick callbacks are one-shot, like a browser animation frame: a loop
//! that wants another frame must request it again from inside its
//! callback.

mod frame;
#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

pub use frame::FrameScheduler;
use web_time::{Duration, Instant};

/// Timing information handed to a tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Display refresh counter of the scheduler (starts at 1).
    pub frame: u64,
    /// Time at which the frame began.
    pub now: Instant,
}

/// One-shot callback run on the next display refresh.
pub type TickCallback = Box<dyn FnOnce(FrameInfo)>;

/// One-shot callback run once a delay has elapsed.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Identifies one pending tick or timer.
///
/// Handles are never reused by a scheduler, so cancelling a handle whose
/// callback already ran is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelHandle {
    /// A pending per-frame callback.
    Tick(u64),
    /// A pending delayed callback.
    Timer(u64),
}

impl CancelHandle {
    /// Raw scheduler-assigned id.
    #[must_use]
    pub fn id(self) -> u64 {
        match self {
            Self::Tick(id) | Self::Timer(id) => id,
        }
    }
}

impl fmt::Display for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tick(id) => write!(f, "tick#{id}"),
            Self::Timer(id) => write!(f, "timer#{id}"),
        }
    }
}

/// Per-frame and delayed callback scheduling on a single thread.
///
/// Implementations must tolerate `cancel` on handles that already fired
/// or were already cancelled.
pub trait Scheduler {
    /// Run `callback` once on the next display refresh.
    fn request_tick(&self, callback: TickCallback) -> CancelHandle;

    /// Run `callback` once after `delay`.
    fn set_timeout(
        &self,
        delay: Duration,
        callback: TimerCallback,
    ) -> CancelHandle;

    /// Prevent a pending callback from running.
    fn cancel(&self, handle: CancelHandle);
}

/// Cancel `slot`'s handle (if any) and clear it.
///
/// Components keep each pending handle in an `Option` slot; this is the
/// single place where that slot gets released.
pub fn cancel_slot(scheduler: &dyn Scheduler, slot: &mut Option<CancelHandle>) {
    if let Some(handle) = slot.take() {
        log::trace!("cancelling {handle}");
        scheduler.cancel(handle);
    }
}
