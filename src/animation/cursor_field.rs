//! Pointer-following radial highlight.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;

use crate::animation::interpolation::SmoothedPoint;
use crate::input::{PointerSource, Subscription};
use crate::options::BackdropOptions;
use crate::scheduler::{cancel_slot, CancelHandle, Scheduler};

/// One rendered state of the highlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientFrame {
    /// Interpolated highlight centre in viewport pixels.
    pub center: Vec2,
    /// Latest pointer position (the point being approached).
    pub target: Vec2,
    /// Gradient radius in pixels.
    pub radius: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Frames rendered since construction.
    pub frame: u64,
}

/// Receives the highlight state once per frame.
pub type FrameSink = Box<dyn FnMut(&GradientFrame)>;

struct FieldState {
    point: SmoothedPoint,
    radius: f32,
    viewport: Vec2,
    tick: Option<CancelHandle>,
    running: bool,
    latest: GradientFrame,
}

impl FieldState {
    fn snapshot(&self) -> GradientFrame {
        GradientFrame {
            center: self.point.current(),
            target: self.point.target(),
            radius: self.radius,
            viewport: self.viewport,
            frame: self.latest.frame,
        }
    }
}

struct FieldShared {
    state: RefCell<FieldState>,
    sink: RefCell<Option<FrameSink>>,
}

/// Radial highlight eased toward the pointer every frame.
///
/// Each frame the centre moves `smoothing` of the remaining distance to
/// the last pointer position. Pointer positions are accepted as-is, even
/// outside the viewport. The frame loop runs for as long as the field is
/// started, whether or not the pointer moves.
pub struct CursorGradientField {
    shared: Rc<FieldShared>,
    scheduler: Rc<dyn Scheduler>,
    subscription: RefCell<Option<Subscription>>,
}

impl CursorGradientField {
    /// Field resting at the centre of `viewport`.
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        viewport: Vec2,
        options: &BackdropOptions,
    ) -> Self {
        let point = SmoothedPoint::new(viewport * 0.5, options.smoothing);
        let state = FieldState {
            point,
            radius: options.radius_px,
            viewport,
            tick: None,
            running: false,
            latest: GradientFrame {
                center: point.current(),
                target: point.target(),
                radius: options.radius_px,
                viewport,
                frame: 0,
            },
        };
        Self {
            shared: Rc::new(FieldShared {
                state: RefCell::new(state),
                sink: RefCell::new(None),
            }),
            scheduler,
            subscription: RefCell::new(None),
        }
    }

    /// Install the sink that receives each frame.
    #[must_use]
    pub fn with_sink(
        self,
        sink: impl FnMut(&GradientFrame) + 'static,
    ) -> Self {
        self.set_sink(sink);
        self
    }

    /// Replace the sink that receives each frame.
    pub fn set_sink(&self, sink: impl FnMut(&GradientFrame) + 'static) {
        *self.shared.sink.borrow_mut() = Some(Box::new(sink));
    }

    /// Subscribe to `pointer` and start the frame loop. Calling `start` on
    /// a running field does nothing.
    pub fn start(&self, pointer: &dyn PointerSource) {
        {
            let mut state = self.shared.state.borrow_mut();
            if state.running {
                return;
            }
            state.running = true;
        }
        let weak = Rc::downgrade(&self.shared);
        let subscription = pointer.on_move(Box::new(move |position| {
            if let Some(shared) = weak.upgrade() {
                shared.state.borrow_mut().point.set_target(position);
            }
        }));
        *self.subscription.borrow_mut() = Some(subscription);
        log::debug!("cursor field started");
        schedule_tick(&self.shared, &self.scheduler);
    }

    /// Unsubscribe from the pointer and cancel the pending tick.
    /// Idempotent.
    pub fn stop(&self) {
        if let Some(mut subscription) = self.subscription.borrow_mut().take()
        {
            subscription.unsubscribe();
        }
        let mut state = self.shared.state.borrow_mut();
        cancel_slot(self.scheduler.as_ref(), &mut state.tick);
        if state.running {
            state.running = false;
            log::debug!("cursor field stopped");
        }
    }

    /// Record a new viewport size. The highlight position is unaffected.
    pub fn set_viewport(&self, viewport: Vec2) {
        self.shared.state.borrow_mut().viewport = viewport;
    }

    /// Feed a pointer position directly, bypassing any subscription.
    pub fn set_target(&self, position: Vec2) {
        self.shared.state.borrow_mut().point.set_target(position);
    }

    /// Last frame delivered to the sink (or the initial state).
    #[must_use]
    pub fn latest_frame(&self) -> GradientFrame {
        self.shared.state.borrow().latest
    }

    /// Interpolated highlight centre.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.shared.state.borrow().point.current()
    }

    /// Latest pointer position.
    #[must_use]
    pub fn target(&self) -> Vec2 {
        self.shared.state.borrow().point.target()
    }

    /// Whether the frame loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.state.borrow().running
    }
}

impl Drop for CursorGradientField {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule_tick(shared: &Rc<FieldShared>, scheduler: &Rc<dyn Scheduler>) {
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

fn on_tick(shared: &Rc<FieldShared>, scheduler: &Rc<dyn Scheduler>) {
    let frame = {
        let mut state = shared.state.borrow_mut();
        state.tick = None;
        if !state.running {
            return;
        }
        let _ = state.point.step();
        state.latest.frame += 1;
        state.latest = state.snapshot();
        state.latest
    };
    if let Some(sink) = shared.sink.borrow_mut().as_mut() {
        sink(&frame);
    }
    schedule_tick(shared, scheduler);
}
