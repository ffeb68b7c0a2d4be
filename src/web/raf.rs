//! `Scheduler` over `requestAnimationFrame` and `setTimeout`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;
use web_time::{Duration, Instant};

use crate::error::GlyphError;
use crate::scheduler::{
    CancelHandle, FrameInfo, Scheduler, TickCallback, TimerCallback,
};
use crate::web::{web_error, window};

enum BrowserCallback {
    Frame(Closure<dyn FnMut(f64)>),
    Timer(Closure<dyn FnMut()>),
}

struct Pending {
    browser_id: i32,
    callback: BrowserCallback,
}

#[derive(Default)]
struct RafState {
    next_id: u64,
    frame: u64,
    pending: FxHashMap<u64, Pending>,
    /// Closures whose callback has fired. The one currently executing is
    /// always in here, so they are only dropped at the next firing.
    retired: Vec<BrowserCallback>,
}

impl RafState {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Move `id`'s closure into the retired list, dropping older ones.
    /// Returns the closures to drop once the state borrow is released.
    fn retire(&mut self, id: u64) -> Vec<BrowserCallback> {
        let stale = std::mem::take(&mut self.retired);
        if let Some(pending) = self.pending.remove(&id) {
            self.retired.push(pending.callback);
        }
        stale
    }
}

/// Browser frame scheduler.
///
/// Each `request_tick` maps to one `requestAnimationFrame` call and each
/// `set_timeout` to one `setTimeout`; `cancel` calls the matching
/// `cancelAnimationFrame` / `clearTimeout` and drops the closure.
pub struct RafScheduler {
    window: Window,
    state: Rc<RefCell<RafState>>,
}

impl RafScheduler {
    /// Scheduler bound to the global window.
    pub fn new() -> Result<Self, GlyphError> {
        Ok(Self {
            window: window()?,
            state: Rc::new(RefCell::new(RafState::default())),
        })
    }

    /// Callbacks currently registered with the browser.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    fn register(&self, id: u64, callback: BrowserCallback, delay_ms: i32) {
        let registered = match &callback {
            BrowserCallback::Frame(closure) => self
                .window
                .request_animation_frame(closure.as_ref().unchecked_ref()),
            BrowserCallback::Timer(closure) => self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    delay_ms,
                ),
        };
        match registered {
            Ok(browser_id) => {
                let _ = self.state.borrow_mut().pending.insert(
                    id,
                    Pending {
                        browser_id,
                        callback,
                    },
                );
            }
            Err(e) => {
                log::error!("{}", web_error("scheduling callback", &e));
            }
        }
    }
}

fn frame_info(state: &Weak<RefCell<RafState>>, id: u64) -> Option<FrameInfo> {
    let state = state.upgrade()?;
    let (frame, stale) = {
        let mut state = state.borrow_mut();
        let stale = state.retire(id);
        state.frame += 1;
        (state.frame, stale)
    };
    drop(stale);
    Some(FrameInfo {
        frame,
        now: Instant::now(),
    })
}

impl Scheduler for RafScheduler {
    fn request_tick(&self, callback: TickCallback) -> CancelHandle {
        let id = self.state.borrow_mut().allocate();
        let weak = Rc::downgrade(&self.state);
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            let Some(info) = frame_info(&weak, id) else {
                return;
            };
            if let Some(callback) = callback.take() {
                callback(info);
            }
        });
        self.register(id, BrowserCallback::Frame(closure), 0);
        CancelHandle::Tick(id)
    }

    fn set_timeout(
        &self,
        delay: Duration,
        callback: TimerCallback,
    ) -> CancelHandle {
        let id = self.state.borrow_mut().allocate();
        let weak = Rc::downgrade(&self.state);
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(state) = weak.upgrade() {
                let stale = state.borrow_mut().retire(id);
                drop(stale);
            }
            if let Some(callback) = callback.take() {
                callback();
            }
        });
        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        self.register(id, BrowserCallback::Timer(closure), delay_ms);
        CancelHandle::Timer(id)
    }

    fn cancel(&self, handle: CancelHandle) {
        let pending = self.state.borrow_mut().pending.remove(&handle.id());
        let Some(pending) = pending else {
            return;
        };
        let result = match pending.callback {
            BrowserCallback::Frame(_) => {
                self.window.cancel_animation_frame(pending.browser_id)
            }
            BrowserCallback::Timer(_) => {
                self.window.clear_timeout_with_handle(pending.browser_id);
                Ok(())
            }
        };
        if let Err(e) = result {
            log::error!("{}", web_error("cancelling callback", &e));
        }
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        let ids: Vec<u64> =
            self.state.borrow().pending.keys().copied().collect();
        for id in ids {
            self.cancel(CancelHandle::Tick(id));
        }
    }
}
