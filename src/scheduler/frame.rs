//! Deterministic, manually driven scheduler.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use web_time::{Duration, Instant};

use super::{CancelHandle, FrameInfo, Scheduler, TickCallback, TimerCallback};

struct PendingTimer {
    due: Instant,
    callback: TimerCallback,
}

struct SchedulerState {
    next_id: u64,
    ticks: FxHashMap<u64, TickCallback>,
    timers: FxHashMap<u64, PendingTimer>,
    frame: u64,
    now: Instant,
    cancelled: u64,
}

impl SchedulerState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Single-threaded scheduler driven by explicit frame calls.
///
/// The scheduler keeps its own clock. [`advance`](Self::advance) moves it
/// forward by a fixed step (tests, fixed-interval loops) and
/// [`run_frame_at`](Self::run_frame_at) jumps it to a wall-clock instant
/// (native event loops). Each frame:
///
/// 1. fires every timer due at the new time, earliest first;
/// 2. runs the tick callbacks pending once those timers have fired.
///
/// Ticks requested by a tick callback wait for the next frame, so a
/// self-rescheduling loop advances exactly one step per frame. Cancelling
/// a callback that is still queued in the current batch keeps it from
/// running.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// use glyphfx::scheduler::{FrameScheduler, Scheduler};
///
/// let scheduler = FrameScheduler::new();
/// let hits = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&hits);
/// let _handle = scheduler.request_tick(Box::new(move |_| {
///     counter.set(counter.get() + 1);
/// }));
/// scheduler.advance(Duration::from_millis(16));
/// scheduler.advance(Duration::from_millis(16));
/// assert_eq!(hits.get(), 1);
/// ```
pub struct FrameScheduler {
    state: RefCell<SchedulerState>,
}

impl FrameScheduler {
    /// Scheduler whose clock starts now.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Scheduler whose clock starts at `start`.
    #[must_use]
    pub fn starting_at(start: Instant) -> Self {
        Self {
            state: RefCell::new(SchedulerState {
                next_id: 0,
                ticks: FxHashMap::default(),
                timers: FxHashMap::default(),
                frame: 0,
                now: start,
                cancelled: 0,
            }),
        }
    }

    /// Move the clock forward by `dt` and run one frame.
    pub fn advance(&self, dt: Duration) {
        let now = self.now() + dt;
        self.run_frame_at(now);
    }

    /// Run `frames` frames spaced `dt` apart.
    pub fn advance_frames(&self, frames: u32, dt: Duration) {
        for _ in 0..frames {
            self.advance(dt);
        }
    }

    /// Set the clock to `now` and run one frame.
    ///
    /// Instants earlier than the current clock are treated as "no time
    /// passed"; the clock never runs backwards.
    pub fn run_frame_at(&self, now: Instant) {
        let frame = {
            let mut state = self.state.borrow_mut();
            if now > state.now {
                state.now = now;
            }
            state.frame += 1;
            FrameInfo {
                frame: state.frame,
                now: state.now,
            }
        };

        for id in self.due_timers(frame.now) {
            // Re-check each timer: an earlier callback may have cancelled it.
            let timer = self.state.borrow_mut().timers.remove(&id);
            if let Some(timer) = timer {
                (timer.callback)();
            }
        }

        let mut batch: Vec<u64> =
            self.state.borrow().ticks.keys().copied().collect();
        batch.sort_unstable();
        for id in batch {
            let callback = self.state.borrow_mut().ticks.remove(&id);
            if let Some(callback) = callback {
                callback(frame);
            }
        }
    }

    fn due_timers(&self, now: Instant) -> Vec<u64> {
        let state = self.state.borrow();
        let mut due: Vec<(Instant, u64)> = state
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= now)
            .map(|(id, timer)| (timer.due, *id))
            .collect();
        due.sort_unstable();
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Frames run so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.state.borrow().frame
    }

    /// Current scheduler clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.state.borrow().now
    }

    /// Tick callbacks waiting for the next frame.
    #[must_use]
    pub fn pending_ticks(&self) -> usize {
        self.state.borrow().ticks.len()
    }

    /// Timers that have not fired yet.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Number of `cancel` calls that removed a pending callback.
    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.state.borrow().cancelled
    }

    /// Whether nothing is pending at all.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let state = self.state.borrow();
        state.ticks.is_empty() && state.timers.is_empty()
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for FrameScheduler {
    fn request_tick(&self, callback: TickCallback) -> CancelHandle {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        let _ = state.ticks.insert(id, callback);
        CancelHandle::Tick(id)
    }

    fn set_timeout(
        &self,
        delay: Duration,
        callback: TimerCallback,
    ) -> CancelHandle {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        let due = state.now + delay;
        let _ = state.timers.insert(id, PendingTimer { due, callback });
        CancelHandle::Timer(id)
    }

    fn cancel(&self, handle: CancelHandle) {
        let mut state = self.state.borrow_mut();
        let removed = match handle {
            CancelHandle::Tick(id) => state.ticks.remove(&id).is_some(),
            CancelHandle::Timer(id) => state.timers.remove(&id).is_some(),
        };
        if removed {
            state.cancelled += 1;
        }
    }
}
