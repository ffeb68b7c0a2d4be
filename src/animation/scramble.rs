//! Single-shot scramble reveal of one string.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::animation::glyph_reveal::{
    RevealBatch, RevealPlayback, RevealTuning,
};
use crate::options::ScrambleOptions;
use crate::scheduler::{cancel_slot, CancelHandle, Scheduler};
use crate::util::rng::BoxedRandom;

/// Receives every displayed string, one call per rendered frame.
pub type TextSink = Box<dyn FnMut(&str)>;

struct ScrambleState {
    text: String,
    display: String,
    tuning: RevealTuning,
    speed: f32,
    /// Fractional logical frames carried between ticks.
    carry: f32,
    rng: BoxedRandom,
    playback: Option<RevealPlayback>,
    tick: Option<CancelHandle>,
    running: bool,
    reveals: u64,
}

struct ScrambleShared {
    state: RefCell<ScrambleState>,
    sink: RefCell<Option<TextSink>>,
}

impl ScrambleShared {
    fn emit(&self, text: &str) {
        if let Some(sink) = self.sink.borrow_mut().as_mut() {
            sink(text);
        }
    }
}

/// Reveals a string by scrambling from whatever is displayed into it.
///
/// The display starts as the text itself. [`start`](Self::start) runs one
/// reveal from the current display to the text; [`set_text`](Self::set_text)
/// cancels any reveal in flight and starts a new one from the partially
/// scrambled display. Once a reveal completes the display equals the text
/// exactly and no further ticks are requested.
///
/// ```
/// use std::rc::Rc;
/// use glyphfx::animation::ScrambleReveal;
/// use glyphfx::options::ScrambleOptions;
/// use glyphfx::util::rng::SeededRandom;
/// use glyphfx::FrameScheduler;
///
/// let scheduler = Rc::new(FrameScheduler::new());
/// let reveal = ScrambleReveal::new(
///     scheduler.clone(),
///     "Dynamic Background",
///     &ScrambleOptions::default(),
///     Box::new(SeededRandom::new(7)),
/// );
/// reveal.start();
/// while reveal.is_revealing() {
///     scheduler.advance_frames(1, web_time::Duration::from_millis(16));
/// }
/// assert_eq!(reveal.display(), "Dynamic Background");
/// ```
pub struct ScrambleReveal {
    shared: Rc<ScrambleShared>,
    scheduler: Rc<dyn Scheduler>,
}

impl ScrambleReveal {
    /// Idle component showing `text`. Nothing is scheduled until
    /// [`start`](Self::start).
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        text: impl Into<String>,
        options: &ScrambleOptions,
        rng: BoxedRandom,
    ) -> Self {
        let text = text.into();
        let state = ScrambleState {
            display: text.clone(),
            text,
            tuning: options.reveal.clone(),
            speed: sanitize_speed(options.speed),
            carry: 0.0,
            rng,
            playback: None,
            tick: None,
            running: false,
            reveals: 0,
        };
        Self {
            shared: Rc::new(ScrambleShared {
                state: RefCell::new(state),
                sink: RefCell::new(None),
            }),
            scheduler,
        }
    }

    /// Install the sink that receives displayed text.
    #[must_use]
    pub fn with_sink(self, sink: impl FnMut(&str) + 'static) -> Self {
        self.set_sink(sink);
        self
    }

    /// Replace the sink that receives displayed text.
    pub fn set_sink(&self, sink: impl FnMut(&str) + 'static) {
        *self.shared.sink.borrow_mut() = Some(Box::new(sink));
    }

    /// Mount: show the current display and reveal the text into it.
    /// Calling `start` on a running component does nothing.
    pub fn start(&self) {
        let display = {
            let mut state = self.shared.state.borrow_mut();
            if state.running {
                return;
            }
            state.running = true;
            state.display.clone()
        };
        log::debug!("scramble reveal started");
        self.shared.emit(&display);
        self.restart();
    }

    /// Change the revealed text. While running, the reveal in flight is
    /// cancelled and a new one starts from the currently displayed string.
    pub fn set_text(&self, text: impl Into<String>) {
        let running = {
            let mut state = self.shared.state.borrow_mut();
            state.text = text.into();
            state.running
        };
        if running {
            self.restart();
        }
    }

    /// Change how many reveal frames advance per scheduler tick.
    pub fn set_speed(&self, speed: f32) {
        self.shared.state.borrow_mut().speed = sanitize_speed(speed);
    }

    /// Unmount: cancel the pending tick. The display keeps its last value.
    /// Idempotent.
    pub fn stop(&self) {
        let mut state = self.shared.state.borrow_mut();
        cancel_slot(self.scheduler.as_ref(), &mut state.tick);
        state.playback = None;
        state.carry = 0.0;
        if state.running {
            state.running = false;
            log::debug!("scramble reveal stopped");
        }
    }

    /// Currently displayed string.
    #[must_use]
    pub fn display(&self) -> String {
        self.shared.state.borrow().display.clone()
    }

    /// Text being revealed.
    #[must_use]
    pub fn text(&self) -> String {
        self.shared.state.borrow().text.clone()
    }

    /// Whether a reveal is in flight.
    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.shared.state.borrow().playback.is_some()
    }

    /// Whether the component is mounted.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.state.borrow().running
    }

    /// Number of reveals started since construction.
    #[must_use]
    pub fn reveals(&self) -> u64 {
        self.shared.state.borrow().reveals
    }

    fn restart(&self) {
        {
            let mut guard = self.shared.state.borrow_mut();
            let state = &mut *guard;
            cancel_slot(self.scheduler.as_ref(), &mut state.tick);
            let batch = RevealBatch::new(
                &state.display,
                &state.text,
                &state.tuning,
                state.rng.as_mut(),
            );
            log::trace!(
                "scramble {:?} -> {:?} over {} frames",
                state.display,
                state.text,
                batch.completion_frame()
            );
            state.playback = Some(RevealPlayback::new(batch));
            state.carry = 0.0;
            state.reveals += 1;
        }
        schedule_tick(&self.shared, &self.scheduler);
    }
}

impl Drop for ScrambleReveal {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sanitize_speed(speed: f32) -> f32 {
    if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        log::warn!("scramble speed {speed} is not positive, using 1.0");
        1.0
    }
}

fn schedule_tick(shared: &Rc<ScrambleShared>, scheduler: &Rc<dyn Scheduler>) {
    let weak_shared = Rc::downgrade(shared);
    let weak_scheduler: Weak<dyn Scheduler> = Rc::downgrade(scheduler);
    let handle = scheduler.request_tick(Box::new(move |_| {
        let (Some(shared), Some(scheduler)) =
            (weak_shared.upgrade(), weak_scheduler.upgrade())
        else {
            return;
        };
        on_tick(&shared, &scheduler);
    }));
    shared.state.borrow_mut().tick = Some(handle);
}

fn on_tick(shared: &Rc<ScrambleShared>, scheduler: &Rc<dyn Scheduler>) {
    let (shown, complete) = {
        let mut guard = shared.state.borrow_mut();
        let state = &mut *guard;
        state.tick = None;
        let Some(playback) = state.playback.as_mut() else {
            return;
        };
        state.carry += state.speed;
        let mut latest = None;
        while state.carry >= 1.0 {
            state.carry -= 1.0;
            let step = playback.step(state.rng.as_mut());
            let done = step.complete;
            latest = Some(step);
            if done {
                break;
            }
        }
        match latest {
            Some(step) => {
                state.display.clone_from(&step.text);
                if step.complete {
                    state.playback = None;
                    state.carry = 0.0;
                }
                (Some(step.text), step.complete)
            }
            None => (None, false),
        }
    };
    if let Some(text) = shown {
        shared.emit(&text);
    }
    if complete {
        log::debug!("scramble reveal complete");
    } else {
        schedule_tick(shared, scheduler);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::scheduler::testing::{Event, RecordingScheduler};
    use crate::scheduler::FrameScheduler;
    use crate::util::rng::{FixedRandom, SeededRandom};

    fn reveal_on(
        scheduler: &Rc<RecordingScheduler>,
        text: &str,
        speed: f32,
    ) -> ScrambleReveal {
        let options = ScrambleOptions {
            speed,
            ..ScrambleOptions::default()
        };
        ScrambleReveal::new(
            scheduler.clone(),
            text,
            &options,
            Box::new(SeededRandom::new(42)),
        )
    }

    fn run_until_settled(
        scheduler: &RecordingScheduler,
        reveal: &ScrambleReveal,
    ) -> u32 {
        let mut frames = 0;
        while reveal.is_revealing() {
            scheduler.frames(1);
            frames += 1;
            assert!(frames < 1000, "reveal never settled");
        }
        frames
    }

    #[test]
    fn reveal_terminates_on_exact_text() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let reveal = reveal_on(&scheduler, "Dynamic Background", 1.0);
        reveal.start();
        let frames = run_until_settled(&scheduler, &reveal);

        assert_eq!(reveal.display(), "Dynamic Background");
        let bound = ScrambleOptions::default().reveal.worst_case_frames();
        assert!(frames <= bound + 1, "{frames} frames, bound {bound}");
        assert_eq!(scheduler.pending_ticks(), 0);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn every_frame_reaches_the_sink() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = seen.clone();
        let reveal = reveal_on(&scheduler, "abc", 1.0).with_sink(move |text| {
            sink_seen.borrow_mut().push(text.to_owned());
        });
        reveal.start();
        let _ = run_until_settled(&scheduler, &reveal);

        let seen = seen.borrow();
        assert_eq!(seen.first().map(String::as_str), Some("abc"));
        assert_eq!(seen.last().map(String::as_str), Some("abc"));
        assert!(seen.len() > 2);
    }

    #[test]
    fn text_change_cancels_before_rescheduling() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let reveal = reveal_on(&scheduler, "first headline", 1.0);
        reveal.start();
        scheduler.frames(3);
        let pending = scheduler
            .events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                Event::Requested(h) => Some(h),
                Event::Cancelled(_) => None,
            })
            .unwrap();

        reveal.set_text("second");
        assert!(scheduler.cancelled_before_requested(pending));
        assert_eq!(scheduler.pending_ticks(), 1);

        let _ = run_until_settled(&scheduler, &reveal);
        assert_eq!(reveal.display(), "second");
        assert_eq!(reveal.reveals(), 2);
    }

    #[test]
    fn restart_scrambles_from_partial_display() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let reveal = reveal_on(&scheduler, "0123456789", 1.0);
        reveal.start();
        scheduler.frames(4);
        reveal.set_text("xyz");
        // The new batch spans the longer of the two strings.
        scheduler.frames(1);
        assert!(reveal.display().chars().count() >= 3);
        let _ = run_until_settled(&scheduler, &reveal);
        assert_eq!(reveal.display(), "xyz");
    }

    #[test]
    fn stop_leaves_nothing_scheduled() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let reveal = reveal_on(&scheduler, "Dynamic Background", 1.0);
        reveal.start();
        scheduler.frames(2);
        reveal.stop();
        reveal.stop();

        let frozen = reveal.display();
        assert!(scheduler.is_idle());
        scheduler.frames(50);
        assert_eq!(reveal.display(), frozen);
        assert!(!reveal.is_running());
    }

    #[test]
    fn drop_cancels_pending_tick() {
        let scheduler = Rc::new(FrameScheduler::new());
        let reveal = ScrambleReveal::new(
            scheduler.clone(),
            "gone",
            &ScrambleOptions::default(),
            Box::new(FixedRandom::constant(0.5)),
        );
        reveal.start();
        assert_eq!(scheduler.pending_ticks(), 1);
        drop(reveal);
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.cancelled(), 1);
    }

    #[test]
    fn half_speed_takes_twice_the_ticks() {
        let fast_scheduler = Rc::new(RecordingScheduler::new());
        let fast = reveal_on(&fast_scheduler, "speed test", 1.0);
        fast.start();
        let fast_frames = run_until_settled(&fast_scheduler, &fast);

        let slow_scheduler = Rc::new(RecordingScheduler::new());
        let slow = reveal_on(&slow_scheduler, "speed test", 0.5);
        slow.start();
        let slow_frames = run_until_settled(&slow_scheduler, &slow);

        assert!(slow_frames >= 2 * fast_frames - 2);
        assert_eq!(slow.display(), "speed test");
    }

    #[test]
    fn speed_change_mid_reveal_still_lands_on_text() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let reveal = reveal_on(&scheduler, "Dynamic Background", 1.0);
        reveal.start();
        scheduler.frames(3);
        assert!(reveal.is_revealing());

        // A quarter frame per tick: three ticks pass without a new frame.
        reveal.set_speed(0.25);
        assert_eq!(scheduler.pending_ticks(), 1);
        let held = reveal.display();
        scheduler.frames(3);
        assert_eq!(reveal.display(), held);
        assert!(reveal.is_revealing());

        let _ = run_until_settled(&scheduler, &reveal);
        assert_eq!(reveal.display(), "Dynamic Background");
        assert_eq!(reveal.reveals(), 1);

        // Non-positive speeds fall back to one frame per tick.
        reveal.set_text("Robots.");
        reveal.set_speed(-2.0);
        let frames = run_until_settled(&scheduler, &reveal);
        let bound = ScrambleOptions::default().reveal.worst_case_frames();
        assert!(frames <= bound + 1);
        assert_eq!(reveal.display(), "Robots.");
        assert!(scheduler.is_idle());
    }

    #[test]
    fn set_text_while_stopped_waits_for_start() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let reveal = reveal_on(&scheduler, "old", 1.0);
        reveal.set_text("new");
        assert!(scheduler.is_idle());
        assert_eq!(reveal.display(), "old");

        reveal.start();
        let _ = run_until_settled(&scheduler, &reveal);
        assert_eq!(reveal.display(), "new");
    }

    #[test]
    fn empty_text_completes_immediately() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let reveal = reveal_on(&scheduler, "", 1.0);
        reveal.start();
        scheduler.frames(1);
        assert!(!reveal.is_revealing());
        assert_eq!(reveal.display(), "");
        assert!(scheduler.is_idle());
    }
}
