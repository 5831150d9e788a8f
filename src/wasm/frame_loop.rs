use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::window;

use super::dom::Listeners;
use crate::task::{CancelToken, FrameClock};

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// requestAnimationFrame loop that reschedules itself until stopped.
pub struct FrameLoop {
    token: CancelToken,
    pending: Rc<Cell<Option<i32>>>,
    slot: FrameSlot,
}

impl FrameLoop {
    /// Starts the loop; `frame` receives seconds since the previous frame.
    pub fn start<F>(mut frame: F) -> Result<Self, JsValue>
    where
        F: FnMut(f32) + 'static,
    {
        let token = CancelToken::new();
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

        // `slot` holds the animation-frame closure so that it can keep
        // calling `request_animation_frame` with itself. Storing it inside an
        // `Option` allows us to create the `Closure` first and then obtain a
        // reference to it from within itself.
        let slot: FrameSlot = Rc::new(RefCell::new(None));
        let this = slot.clone();
        let scheduled = pending.clone();
        let mut clock = FrameClock::new(token.clone());
        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            scheduled.set(None);
            let Some(dt) = clock.tick(now) else {
                return;
            };
            frame(dt);
            if let Some(cb) = this.borrow().as_ref() {
                match request(cb) {
                    Ok(id) => scheduled.set(Some(id)),
                    Err(err) => log::error!("requestAnimationFrame: {err:?}"),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(cb) = slot.borrow().as_ref() {
            pending.set(Some(request(cb)?));
        }
        Ok(Self {
            token,
            pending,
            slot,
        })
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Cancels the pending frame and releases the closure. Must not be called
    /// from inside this loop's own frame callback.
    pub fn stop(&self) {
        self.token.cancel();
        if let (Some(id), Some(w)) = (self.pending.take(), window()) {
            if let Err(err) = w.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame: {err:?}");
            }
        }
        self.slot.borrow_mut().take();
    }
}

// The frame closure holds its own slot, so only an explicit stop breaks the
// cycle.
impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request(cb: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window()
        .ok_or("no window")?
        .request_animation_frame(cb.as_ref().unchecked_ref())
}

/// Handle returned by every mounted effect unit. Dropping it tears the unit
/// down exactly like `stop`.
pub struct EffectHandle {
    name: &'static str,
    frames: Option<FrameLoop>,
    listeners: Listeners,
    cleanup: Vec<Box<dyn FnOnce()>>,
}

impl EffectHandle {
    pub fn new(name: &'static str, frames: Option<FrameLoop>, listeners: Listeners) -> Self {
        Self {
            name,
            frames,
            listeners,
            cleanup: Vec::new(),
        }
    }

    /// Runs `f` when the handle stops (e.g. to detach created elements).
    pub fn on_stop<F: FnOnce() + 'static>(mut self, f: F) -> Self {
        self.cleanup.push(Box::new(f));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_running(&self) -> bool {
        self.frames.as_ref().is_some_and(FrameLoop::is_running)
    }

    /// Stop flag of the unit's frame loop, if it runs one.
    pub fn cancel_token(&self) -> Option<CancelToken> {
        self.frames.as_ref().map(FrameLoop::token)
    }

    /// Halts rendering, removes every listener the unit registered and
    /// detaches what it created.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for EffectHandle {
    fn drop(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.stop();
        }
        self.listeners.clear();
        for f in self.cleanup.drain(..) {
            f();
        }
        log::info!("{}: stopped", self.name);
    }
}
