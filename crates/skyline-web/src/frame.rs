//! requestAnimationFrame loop.
//!
//! The callback re-queues itself each frame. Cancelling sets a flag checked
//! at the top of the callback, cancels the pending request and drops the
//! closure, so a frame already queued by the browser can never run after
//! [`stop`] returns.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use skyline_core::{drive_frame, FrameSink, HeroSimulation, SceneError, Shared};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub struct RafLoop {
    cancelled: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
    tick: Tick,
}

fn request(
    window: &web::Window,
    tick: &Tick,
    pending: &Cell<Option<i32>>,
) -> Result<(), SceneError> {
    let tick = tick.borrow();
    let Some(cb) = tick.as_ref() else {
        return Ok(());
    };
    let id = window
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .map_err(|e| SceneError::FrameLoop(format!("{e:?}")))?;
    pending.set(Some(id));
    Ok(())
}

pub fn start<R: FrameSink + 'static>(
    window: &web::Window,
    sim: &Shared<HeroSimulation>,
    renderer: &Shared<R>,
) -> Result<RafLoop, SceneError> {
    let cancelled = Rc::new(Cell::new(false));
    let pending = Rc::new(Cell::new(None));
    let tick: Tick = Rc::new(RefCell::new(None));

    let sim = sim.clone();
    let renderer = renderer.clone();
    let window_in = window.clone();
    let cancelled_in = cancelled.clone();
    let pending_in = pending.clone();
    let tick_in = tick.clone();
    let mut failures = 0u32;

    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_in.set(None);
        if cancelled_in.get() {
            return;
        }
        if let Err(e) = drive_frame(&sim, &renderer, instant::now() / 1000.0) {
            failures += 1;
            if failures == 1 {
                log::warn!("[frame] {e}");
            } else {
                log::debug!("[frame] {e} ({failures} failed frames)");
            }
        }
        if cancelled_in.get() {
            return;
        }
        if let Err(e) = request(&window_in, &tick_in, &pending_in) {
            log::error!("[frame] {e}");
        }
    }) as Box<dyn FnMut()>));

    if let Err(e) = request(window, &tick, &pending) {
        tick.borrow_mut().take();
        return Err(e);
    }
    Ok(RafLoop {
        cancelled,
        pending,
        tick,
    })
}

pub fn stop(window: &web::Window, handle: RafLoop) {
    handle.cancelled.set(true);
    if let Some(id) = handle.pending.take() {
        let _ = window.cancel_animation_frame(id);
    }
    // Breaks the closure's reference to itself.
    handle.tick.borrow_mut().take();
}
