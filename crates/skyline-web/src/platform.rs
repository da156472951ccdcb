use fnv::FnvHashMap;
use skyline_core::{
    normalize_pointer, HeroSimulation, InputKind, Platform, SceneError, ScrollInput, Shared,
    Viewport,
};
use skyline_render::GpuState;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;
use crate::frame::{self, RafLoop};

struct Registered {
    target: web::EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web::Event)>,
}

pub struct ListenerId(u32);

/// Browser host: window listeners that can be removed again and a
/// requestAnimationFrame loop.
pub struct WebPlatform {
    window: web::Window,
    document: web::Document,
    canvas: web::HtmlCanvasElement,
    listeners: FnvHashMap<u32, Registered>,
    next_id: u32,
}

impl WebPlatform {
    pub fn new(
        window: web::Window,
        document: web::Document,
        canvas: web::HtmlCanvasElement,
    ) -> Self {
        Self {
            window,
            document,
            canvas,
            listeners: FnvHashMap::default(),
            next_id: 0,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn callback_for(
        &self,
        kind: InputKind,
        sim: &Shared<HeroSimulation>,
    ) -> Box<dyn FnMut(web::Event)> {
        let sim = sim.clone();
        let window = self.window.clone();
        let document = self.document.clone();
        match kind {
            InputKind::Scroll => Box::new(move |_: web::Event| {
                let snapshot = dom::scroll_snapshot(&window, &document);
                sim.borrow_mut().on_scroll(snapshot);
            }),
            InputKind::Resize => {
                let canvas = self.canvas.clone();
                Box::new(move |_: web::Event| {
                    dom::sync_canvas_backing_size(&window, &canvas);
                    let mut sim = sim.borrow_mut();
                    sim.on_resize(dom::canvas_viewport(&canvas));
                    // Document height usually changes with the width.
                    sim.on_scroll(dom::scroll_snapshot(&window, &document));
                })
            }
            InputKind::Pointer => Box::new(move |ev: web::Event| {
                let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                    return;
                };
                let (w, h) = dom::inner_size(&window);
                let pointer = normalize_pointer(
                    ev.client_x() as f32,
                    ev.client_y() as f32,
                    w as f32,
                    h as f32,
                );
                sim.borrow_mut().on_pointer(pointer);
            }),
        }
    }
}

fn event_name(kind: InputKind) -> &'static str {
    match kind {
        InputKind::Scroll => "scroll",
        InputKind::Resize => "resize",
        InputKind::Pointer => "pointermove",
    }
}

impl Platform for WebPlatform {
    type Renderer = GpuState;
    type Listener = ListenerId;
    type Loop = RafLoop;

    fn scroll_snapshot(&self) -> ScrollInput {
        dom::scroll_snapshot(&self.window, &self.document)
    }

    fn viewport(&self) -> Viewport {
        dom::sync_canvas_backing_size(&self.window, &self.canvas);
        dom::canvas_viewport(&self.canvas)
    }

    fn listen(
        &mut self,
        kind: InputKind,
        sim: &Shared<HeroSimulation>,
    ) -> Result<ListenerId, SceneError> {
        let event = event_name(kind);
        let callback = Closure::wrap(self.callback_for(kind, sim));
        let target: web::EventTarget = self.window.clone().into();
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &dom::passive(),
            )
            .map_err(|e| SceneError::Listener {
                kind,
                reason: format!("{e:?}"),
            })?;

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.insert(
            id,
            Registered {
                target,
                event,
                callback,
            },
        );
        log::debug!("[web] listening for {event}");
        Ok(ListenerId(id))
    }

    fn unlisten(&mut self, listener: ListenerId) {
        let Some(reg) = self.listeners.remove(&listener.0) else {
            return;
        };
        if let Err(e) = reg
            .target
            .remove_event_listener_with_callback(reg.event, reg.callback.as_ref().unchecked_ref())
        {
            log::warn!("[web] could not remove {} listener: {e:?}", reg.event);
        }
    }

    fn start_loop(
        &mut self,
        sim: &Shared<HeroSimulation>,
        renderer: &Shared<GpuState>,
    ) -> Result<RafLoop, SceneError> {
        frame::start(&self.window, sim, renderer)
    }

    fn stop_loop(&mut self, handle: RafLoop) {
        frame::stop(&self.window, handle);
    }
}
