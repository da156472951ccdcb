//! Mount/unmount wiring between the simulation, a renderer and the host.
//!
//! A [`Platform`] supplies input listeners and a frame loop; a [`FrameSink`]
//! draws. [`Lifecycle`] acquires them in order and releases them in the
//! reverse order on every exit path, so a failed mount leaves nothing behind.

use crate::camera::Viewport;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::random::RandomSource;
use crate::scene::Scene;
use crate::scroll::ScrollInput;
use crate::simulation::{shared, FrameState, HeroSimulation, Shared};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    Scroll,
    Resize,
    Pointer,
}

impl InputKind {
    pub const ALL: [InputKind; 3] = [InputKind::Scroll, InputKind::Resize, InputKind::Pointer];
}

/// Something that can draw a [`Scene`].
pub trait FrameSink {
    /// Upload geometry once per mount.
    fn upload_scene(&mut self, scene: &Scene) -> Result<(), SceneError>;
    /// Cheap when the size is unchanged.
    fn resize(&mut self, viewport: Viewport);
    fn draw(&mut self, frame: &FrameState) -> Result<(), SceneError>;
    /// Free GPU resources. Must be safe to call twice.
    fn release(&mut self);
}

/// Host services: page metrics, input listeners and the display-refresh loop.
pub trait Platform {
    type Renderer: FrameSink + 'static;
    type Listener;
    type Loop;

    fn scroll_snapshot(&self) -> ScrollInput;
    fn viewport(&self) -> Viewport;

    fn listen(
        &mut self,
        kind: InputKind,
        sim: &Shared<HeroSimulation>,
    ) -> Result<Self::Listener, SceneError>;
    fn unlisten(&mut self, listener: Self::Listener);

    /// Begin calling [`drive_frame`] once per display refresh.
    fn start_loop(
        &mut self,
        sim: &Shared<HeroSimulation>,
        renderer: &Shared<Self::Renderer>,
    ) -> Result<Self::Loop, SceneError>;
    /// After this returns no further frame may run, even one already queued.
    fn stop_loop(&mut self, handle: Self::Loop);
}

/// One display-refresh tick: advance the simulation, then draw.
pub fn drive_frame<R: FrameSink>(
    sim: &Shared<HeroSimulation>,
    renderer: &Shared<R>,
    now_sec: f64,
) -> Result<(), SceneError> {
    let frame = sim.borrow_mut().tick(now_sec);
    let mut renderer = renderer.borrow_mut();
    renderer.resize(frame.viewport);
    if frame.viewport.is_degenerate() {
        return Ok(());
    }
    renderer.draw(&frame)
}

#[derive(Debug)]
pub enum MountOutcome {
    Running,
    /// Background absent; the page carries on without it.
    Degraded(SceneError),
}

impl MountOutcome {
    pub fn is_running(&self) -> bool {
        matches!(self, MountOutcome::Running)
    }
}

struct Mounted<P: Platform> {
    sim: Shared<HeroSimulation>,
    renderer: Shared<P::Renderer>,
    listeners: Vec<P::Listener>,
    frame_loop: Option<P::Loop>,
}

pub struct Lifecycle<P: Platform> {
    platform: P,
    config: SceneConfig,
    mounted: Option<Mounted<P>>,
}

impl<P: Platform> Lifecycle<P> {
    pub fn new(platform: P, config: SceneConfig) -> Self {
        Self {
            platform,
            config,
            mounted: None,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Takes effect on the next mount.
    pub fn set_config(&mut self, config: SceneConfig) {
        self.config = config;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn simulation(&self) -> Option<Shared<HeroSimulation>> {
        self.mounted.as_ref().map(|m| m.sim.clone())
    }

    pub fn renderer(&self) -> Option<Shared<P::Renderer>> {
        self.mounted.as_ref().map(|m| m.renderer.clone())
    }

    /// Build the scene, register listeners and start the loop. An existing
    /// mount is torn down first. `renderer` is the result of creating the
    /// drawing context; if that failed no geometry is generated.
    pub fn mount(
        &mut self,
        renderer: Result<P::Renderer, SceneError>,
        rng: &mut dyn RandomSource,
    ) -> MountOutcome {
        self.unmount();

        let mut renderer = match renderer {
            Ok(r) => r,
            Err(e) => {
                log::warn!("[lifecycle] rendering context unavailable, background disabled: {e}");
                return MountOutcome::Degraded(e);
            }
        };

        let prepared = Scene::build(&self.config, rng).and_then(|scene| {
            renderer.upload_scene(&scene)?;
            Ok(scene)
        });
        if let Err(e) = prepared {
            log::warn!("[lifecycle] scene setup failed, background disabled: {e}");
            renderer.release();
            return MountOutcome::Degraded(e);
        }

        let viewport = self.platform.viewport();
        let mut sim = HeroSimulation::new(&self.config, viewport);
        sim.on_scroll(self.platform.scroll_snapshot());
        renderer.resize(viewport);

        let mut mounted = Mounted::<P> {
            sim: shared(sim),
            renderer: shared(renderer),
            listeners: Vec::with_capacity(InputKind::ALL.len()),
            frame_loop: None,
        };

        for kind in InputKind::ALL {
            match self.platform.listen(kind, &mounted.sim) {
                Ok(l) => mounted.listeners.push(l),
                Err(e) => {
                    log::warn!("[lifecycle] {e}");
                    Self::teardown(&mut self.platform, mounted);
                    return MountOutcome::Degraded(e);
                }
            }
        }

        match self.platform.start_loop(&mounted.sim, &mounted.renderer) {
            Ok(handle) => mounted.frame_loop = Some(handle),
            Err(e) => {
                log::warn!("[lifecycle] {e}");
                Self::teardown(&mut self.platform, mounted);
                return MountOutcome::Degraded(e);
            }
        }

        log::info!(
            "[lifecycle] mounted at {}x{}",
            viewport.width,
            viewport.height
        );
        self.mounted = Some(mounted);
        MountOutcome::Running
    }

    /// Stop the loop, remove listeners, release the renderer. A no-op when
    /// nothing is mounted.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            Self::teardown(&mut self.platform, mounted);
            log::info!("[lifecycle] unmounted");
        }
    }

    fn teardown(platform: &mut P, mut mounted: Mounted<P>) {
        if let Some(handle) = mounted.frame_loop.take() {
            platform.stop_loop(handle);
        }
        for listener in mounted.listeners.drain(..) {
            platform.unlisten(listener);
        }
        mounted.renderer.borrow_mut().release();
    }
}

impl<P: Platform> Drop for Lifecycle<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}
