//! Cycling text with a glyph-reveal transition between entries.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use web_time::Duration;

use crate::animation::glyph_reveal::{
    RevealBatch, RevealPlayback, RevealTuning,
};
use crate::animation::scramble::TextSink;
use crate::options::RotatorOptions;
use crate::scheduler::{cancel_slot, CancelHandle, Scheduler};
use crate::util::rng::BoxedRandom;

/// Where the rotator is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatorPhase {
    /// Showing `texts[index]` exactly, waiting for the interval timer.
    Idle {
        /// Entry on display.
        index: usize,
    },
    /// Scrambling from one entry into the next.
    Transitioning {
        /// Entry being left.
        from: usize,
        /// Entry being revealed.
        to: usize,
    },
}

impl RotatorPhase {
    /// Entry committed as current (the `from` side while transitioning).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Idle { index } => index,
            Self::Transitioning { from, .. } => from,
        }
    }
}

struct RotatorState {
    texts: Vec<String>,
    interval: Duration,
    tuning: RevealTuning,
    rng: BoxedRandom,
    phase: RotatorPhase,
    display: String,
    playback: Option<RevealPlayback>,
    timer: Option<CancelHandle>,
    tick: Option<CancelHandle>,
    running: bool,
    cycles: u64,
}

impl RotatorState {
    fn committed_text(&self) -> String {
        self.texts
            .get(self.phase.index())
            .cloned()
            .unwrap_or_default()
    }
}

struct RotatorShared {
    state: RefCell<RotatorState>,
    sink: RefCell<Option<TextSink>>,
}

impl RotatorShared {
    fn emit(&self, text: &str) {
        if let Some(sink) = self.sink.borrow_mut().as_mut() {
            sink(text);
        }
    }
}

/// Cycles through an ordered list of strings.
///
/// Each entry is shown exactly for `interval`, then the rotator scrambles
/// from it into the next entry (wrapping to the first after the last).
/// While idle the display is exactly the current entry. At most one
/// interval timer and one frame tick are pending at any time.
pub struct CrossFadeRotator {
    shared: Rc<RotatorShared>,
    scheduler: Rc<dyn Scheduler>,
}

impl CrossFadeRotator {
    /// Idle rotator on the first entry. Nothing is scheduled until
    /// [`start`](Self::start).
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        texts: Vec<String>,
        interval: Duration,
        tuning: RevealTuning,
        rng: BoxedRandom,
    ) -> Self {
        let display = texts.first().cloned().unwrap_or_default();
        let state = RotatorState {
            texts,
            interval,
            tuning,
            rng,
            phase: RotatorPhase::Idle { index: 0 },
            display,
            playback: None,
            timer: None,
            tick: None,
            running: false,
            cycles: 0,
        };
        Self {
            shared: Rc::new(RotatorShared {
                state: RefCell::new(state),
                sink: RefCell::new(None),
            }),
            scheduler,
        }
    }

    /// Rotator configured from an options section.
    pub fn from_options(
        scheduler: Rc<dyn Scheduler>,
        options: &RotatorOptions,
        rng: BoxedRandom,
    ) -> Self {
        Self::new(
            scheduler,
            options.texts.clone(),
            options.interval(),
            options.reveal.clone(),
            rng,
        )
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

    /// Mount: show the current entry and arm the interval timer.
    /// Calling `start` on a running rotator does nothing.
    pub fn start(&self) {
        let display = {
            let mut state = self.shared.state.borrow_mut();
            if state.running {
                return;
            }
            state.running = true;
            state.display.clone()
        };
        log::debug!("rotator started");
        self.shared.emit(&display);
        arm_timer(&self.shared, &self.scheduler);
    }

    /// Replace the entries. Cancels any pending timer or transition, keeps
    /// the current index when it is still in range (otherwise wraps it),
    /// shows that entry exactly and restarts the interval.
    pub fn set_texts(&self, texts: Vec<String>) {
        {
            let mut state = self.shared.state.borrow_mut();
            state.texts = texts;
        }
        self.reset_cycle();
    }

    /// Change the pause between transitions. Restarts the current cycle.
    pub fn set_interval(&self, interval: Duration) {
        self.shared.state.borrow_mut().interval = interval;
        self.reset_cycle();
    }

    /// Unmount: cancel the timer and any transition and show the current
    /// entry exactly. Idempotent.
    pub fn stop(&self) {
        let mut state = self.shared.state.borrow_mut();
        cancel_slot(self.scheduler.as_ref(), &mut state.timer);
        cancel_slot(self.scheduler.as_ref(), &mut state.tick);
        state.playback = None;
        let index = state.phase.index();
        state.phase = RotatorPhase::Idle { index };
        state.display = state.committed_text();
        if state.running {
            state.running = false;
            log::debug!("rotator stopped");
        }
    }

    /// Currently displayed string.
    #[must_use]
    pub fn display(&self) -> String {
        self.shared.state.borrow().display.clone()
    }

    /// Entry committed as current.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.shared.state.borrow().phase.index()
    }

    /// Current phase of the cycle.
    #[must_use]
    pub fn phase(&self) -> RotatorPhase {
        self.shared.state.borrow().phase
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase(), RotatorPhase::Transitioning { .. })
    }

    /// Whether the rotator is mounted.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.state.borrow().running
    }

    /// Completed transitions since construction.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.shared.state.borrow().cycles
    }

    /// Entries being cycled.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.shared.state.borrow().texts.clone()
    }

    fn reset_cycle(&self) {
        let (display, running) = {
            let mut state = self.shared.state.borrow_mut();
            cancel_slot(self.scheduler.as_ref(), &mut state.timer);
            cancel_slot(self.scheduler.as_ref(), &mut state.tick);
            state.playback = None;
            let len = state.texts.len();
            let index = if len == 0 { 0 } else { state.phase.index() % len };
            state.phase = RotatorPhase::Idle { index };
            state.display = state.committed_text();
            (state.display.clone(), state.running)
        };
        if running {
            self.shared.emit(&display);
            arm_timer(&self.shared, &self.scheduler);
        }
    }
}

impl Drop for CrossFadeRotator {
    fn drop(&mut self) {
        self.stop();
    }
}

fn weak_pair(
    shared: &Rc<RotatorShared>,
    scheduler: &Rc<dyn Scheduler>,
) -> (Weak<RotatorShared>, Weak<dyn Scheduler>) {
    (Rc::downgrade(shared), Rc::downgrade(scheduler))
}

fn arm_timer(shared: &Rc<RotatorShared>, scheduler: &Rc<dyn Scheduler>) {
    let interval = {
        let mut state = shared.state.borrow_mut();
        cancel_slot(scheduler.as_ref(), &mut state.timer);
        if state.texts.is_empty() {
            log::warn!("rotator has no texts, nothing to cycle");
            return;
        }
        state.interval
    };
    let (weak_shared, weak_scheduler) = weak_pair(shared, scheduler);
    let handle = scheduler.set_timeout(
        interval,
        Box::new(move || {
            let (Some(shared), Some(scheduler)) =
                (weak_shared.upgrade(), weak_scheduler.upgrade())
            else {
                return;
            };
            begin_transition(&shared, &scheduler);
        }),
    );
    shared.state.borrow_mut().timer = Some(handle);
}

fn begin_transition(
    shared: &Rc<RotatorShared>,
    scheduler: &Rc<dyn Scheduler>,
) {
    {
        let mut guard = shared.state.borrow_mut();
        let state = &mut *guard;
        state.timer = None;
        let len = state.texts.len();
        if len == 0 {
            return;
        }
        let from = state.phase.index() % len;
        let to = (from + 1) % len;
        let batch = RevealBatch::new(
            &state.texts[from],
            &state.texts[to],
            &state.tuning,
            state.rng.as_mut(),
        );
        log::trace!(
            "rotator {from} -> {to} over {} frames",
            batch.completion_frame()
        );
        state.playback = Some(RevealPlayback::new(batch));
        state.phase = RotatorPhase::Transitioning { from, to };
    }
    schedule_tick(shared, scheduler);
}

fn schedule_tick(shared: &Rc<RotatorShared>, scheduler: &Rc<dyn Scheduler>) {
    let (weak_shared, weak_scheduler) = weak_pair(shared, scheduler);
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

fn on_tick(shared: &Rc<RotatorShared>, scheduler: &Rc<dyn Scheduler>) {
    let (text, complete) = {
        let mut guard = shared.state.borrow_mut();
        let state = &mut *guard;
        state.tick = None;
        let RotatorPhase::Transitioning { to, .. } = state.phase else {
            return;
        };
        let Some(playback) = state.playback.as_mut() else {
            return;
        };
        let step = playback.step(state.rng.as_mut());
        state.display.clone_from(&step.text);
        if step.complete {
            state.playback = None;
            state.phase = RotatorPhase::Idle { index: to };
            state.cycles += 1;
        }
        (step.text, step.complete)
    };
    shared.emit(&text);
    if complete {
        log::debug!("rotator now showing {text:?}");
        arm_timer(shared, scheduler);
    } else {
        schedule_tick(shared, scheduler);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::scheduler::testing::{RecordingScheduler, FRAME};
    use crate::util::rng::SeededRandom;

    const INTERVAL: Duration = Duration::from_millis(2000);

    fn abc(scheduler: &Rc<RecordingScheduler>) -> CrossFadeRotator {
        CrossFadeRotator::new(
            scheduler.clone(),
            vec!["A".into(), "B".into(), "C".into()],
            INTERVAL,
            RevealTuning::rotator(),
            Box::new(SeededRandom::new(3)),
        )
    }

    fn run_until_cycles(
        scheduler: &RecordingScheduler,
        rotator: &CrossFadeRotator,
        cycles: u64,
    ) {
        let mut frames = 0;
        while rotator.cycles() < cycles {
            scheduler.frames(1);
            frames += 1;
            assert!(frames < 10_000, "rotator stalled");
        }
    }

    #[test]
    fn one_cycle_advances_one_entry() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();
        run_until_cycles(&scheduler, &rotator, 1);

        assert_eq!(rotator.current_index(), 1);
        assert_eq!(rotator.display(), "B");
        assert_eq!(rotator.phase(), RotatorPhase::Idle { index: 1 });
    }

    #[test]
    fn three_cycles_wrap_to_first() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();
        run_until_cycles(&scheduler, &rotator, 3);

        assert_eq!(rotator.current_index(), 0);
        assert_eq!(rotator.display(), "A");
    }

    #[test]
    fn idle_display_is_exact_until_interval() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();

        // 100 frames of 16ms stay short of the 2s interval.
        for _ in 0..100 {
            scheduler.frames(1);
            assert_eq!(rotator.display(), "A");
            assert!(!rotator.is_transitioning());
        }
        assert_eq!(scheduler.pending_timers(), 1);
        assert_eq!(scheduler.pending_ticks(), 0);
    }

    #[test]
    fn transition_starts_after_interval() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();
        scheduler.advance(INTERVAL);

        assert_eq!(
            rotator.phase(),
            RotatorPhase::Transitioning { from: 0, to: 1 }
        );
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn at_most_one_timer_and_one_tick() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();
        for _ in 0..600 {
            scheduler.frames(1);
            let pending =
                scheduler.pending_timers() + scheduler.pending_ticks();
            assert_eq!(pending, 1);
        }
    }

    #[test]
    fn set_texts_mid_transition_commits_current_entry() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();
        scheduler.advance(INTERVAL);
        scheduler.frames(2);
        assert!(rotator.is_transitioning());

        rotator.set_texts(vec!["x".into(), "y".into()]);
        assert_eq!(rotator.phase(), RotatorPhase::Idle { index: 0 });
        assert_eq!(rotator.display(), "x");
        assert_eq!(scheduler.pending_ticks(), 0);
        assert_eq!(scheduler.pending_timers(), 1);

        run_until_cycles(&scheduler, &rotator, 1);
        assert_eq!(rotator.display(), "y");
    }

    #[test]
    fn shrinking_list_wraps_index() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();
        run_until_cycles(&scheduler, &rotator, 2);
        assert_eq!(rotator.current_index(), 2);

        rotator.set_texts(vec!["only".into(), "two".into()]);
        assert_eq!(rotator.current_index(), 0);
        assert_eq!(rotator.display(), "only");
    }

    #[test]
    fn empty_list_schedules_nothing() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = CrossFadeRotator::new(
            scheduler.clone(),
            Vec::new(),
            INTERVAL,
            RevealTuning::rotator(),
            Box::new(SeededRandom::new(1)),
        );
        rotator.start();
        assert!(scheduler.is_idle());
        assert_eq!(rotator.display(), "");
        scheduler.advance(INTERVAL * 3);
        assert_eq!(rotator.cycles(), 0);
    }

    #[test]
    fn stop_cancels_timer_and_tick() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();
        scheduler.advance(INTERVAL);
        scheduler.frames(1);
        rotator.stop();
        rotator.stop();

        assert!(scheduler.is_idle());
        assert_eq!(rotator.display(), "A");
        scheduler.advance(INTERVAL * 2);
        assert_eq!(rotator.display(), "A");
    }

    #[test]
    fn interval_change_restarts_timer() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();
        scheduler.advance(Duration::from_millis(1500));
        rotator.set_interval(Duration::from_millis(1000));

        scheduler.advance(Duration::from_millis(900));
        assert!(!rotator.is_transitioning());
        scheduler.advance(FRAME * 7);
        assert!(rotator.is_transitioning());
    }

    #[test]
    fn dropping_rotator_leaves_scheduler_idle() {
        let scheduler = Rc::new(RecordingScheduler::new());
        let rotator = abc(&scheduler);
        rotator.start();
        drop(rotator);
        assert!(scheduler.is_idle());
    }
}
