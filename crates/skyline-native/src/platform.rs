use std::sync::Arc;

use skyline_core::{
    drive_frame, HeroSimulation, InputKind, Platform, SceneError, ScrollInput, Shared, Viewport,
};
use skyline_render::GpuState;
use winit::window::Window;

use crate::document::VirtualDocument;

pub struct ListenerId(u32);
pub struct LoopId(u32);

struct Running {
    id: u32,
    sim: Shared<HeroSimulation>,
    renderer: Shared<GpuState>,
}

/// Desktop host. Window events are routed by the event loop through
/// [`NativePlatform::emit`]; frames run from [`NativePlatform::pump`].
pub struct NativePlatform {
    window: Arc<Window>,
    document: VirtualDocument,
    listeners: Vec<(u32, InputKind, Shared<HeroSimulation>)>,
    running: Option<Running>,
    next_id: u32,
}

impl NativePlatform {
    pub fn new(window: Arc<Window>) -> Self {
        let height = window.inner_size().height as f32;
        Self {
            window,
            document: VirtualDocument::new(height),
            listeners: Vec::new(),
            running: None,
            next_id: 0,
        }
    }

    pub fn document(&self) -> &VirtualDocument {
        &self.document
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Deliver an input event to every simulation listening for `kind`.
    pub fn emit(&self, kind: InputKind, mut f: impl FnMut(&mut HeroSimulation)) {
        for (_, k, sim) in &self.listeners {
            if *k == kind {
                f(&mut sim.borrow_mut());
            }
        }
    }

    /// Apply a document scroll and notify scroll listeners when it moved.
    pub fn scroll(&mut self, f: impl FnOnce(&mut VirtualDocument) -> bool) {
        if f(&mut self.document) {
            let snapshot = self.document.snapshot();
            self.emit(InputKind::Scroll, |sim| {
                sim.on_scroll(snapshot);
            });
        }
    }

    pub fn window_resized(&mut self, viewport: Viewport) {
        self.document.set_viewport_height(viewport.height as f32);
        let snapshot = self.document.snapshot();
        self.emit(InputKind::Resize, |sim| {
            sim.on_resize(viewport);
            sim.on_scroll(snapshot);
        });
    }

    /// Run one frame if the loop is started.
    pub fn pump(&self, now_sec: f64) -> Result<(), SceneError> {
        match &self.running {
            Some(r) => drive_frame(&r.sim, &r.renderer, now_sec),
            None => Ok(()),
        }
    }
}

impl Platform for NativePlatform {
    type Renderer = GpuState;
    type Listener = ListenerId;
    type Loop = LoopId;

    fn scroll_snapshot(&self) -> ScrollInput {
        self.document.snapshot()
    }

    fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(size.width, size.height)
    }

    fn listen(
        &mut self,
        kind: InputKind,
        sim: &Shared<HeroSimulation>,
    ) -> Result<ListenerId, SceneError> {
        let id = self.next_id();
        self.listeners.push((id, kind, sim.clone()));
        Ok(ListenerId(id))
    }

    fn unlisten(&mut self, listener: ListenerId) {
        self.listeners.retain(|(id, _, _)| *id != listener.0);
    }

    fn start_loop(
        &mut self,
        sim: &Shared<HeroSimulation>,
        renderer: &Shared<GpuState>,
    ) -> Result<LoopId, SceneError> {
        let id = self.next_id();
        self.running = Some(Running {
            id,
            sim: sim.clone(),
            renderer: renderer.clone(),
        });
        self.window.request_redraw();
        Ok(LoopId(id))
    }

    fn stop_loop(&mut self, handle: LoopId) {
        if self.running.as_ref().is_some_and(|r| r.id == handle.0) {
            self.running = None;
        }
    }
}
