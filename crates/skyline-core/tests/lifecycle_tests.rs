// Host-side tests for mount/unmount ordering and resource release, using an
// in-memory platform that counts live listeners and frame loops.

use std::cell::RefCell;
use std::rc::Rc;

use skyline_core::lifecycle::drive_frame;
use skyline_core::{
    shared, FrameSink, FrameState, HeroSimulation, InputKind, Lifecycle, MountOutcome, Platform,
    Scene, SceneConfig, SceneError, ScrollInput, SeededRandom, Shared, Viewport,
};

#[derive(Default)]
struct Counters {
    listeners: usize,
    loops: usize,
    uploads: usize,
    draws: usize,
    releases: usize,
    log: Vec<&'static str>,
}

#[derive(Clone)]
struct FakeRenderer {
    counters: Rc<RefCell<Counters>>,
    fail_upload: bool,
    released: bool,
}

impl FrameSink for FakeRenderer {
    fn upload_scene(&mut self, _scene: &Scene) -> Result<(), SceneError> {
        if self.fail_upload {
            return Err(SceneError::ContextUnavailable("lost".into()));
        }
        self.counters.borrow_mut().uploads += 1;
        Ok(())
    }

    fn resize(&mut self, _viewport: Viewport) {}

    fn draw(&mut self, _frame: &FrameState) -> Result<(), SceneError> {
        self.counters.borrow_mut().draws += 1;
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            let mut c = self.counters.borrow_mut();
            c.releases += 1;
            c.log.push("release");
        }
    }
}

struct FakePlatform {
    counters: Rc<RefCell<Counters>>,
    fail_listen: Option<InputKind>,
    fail_loop: bool,
    running: Option<(Shared<HeroSimulation>, Shared<FakeRenderer>)>,
}

impl FakePlatform {
    fn new(counters: Rc<RefCell<Counters>>) -> Self {
        Self {
            counters,
            fail_listen: None,
            fail_loop: false,
            running: None,
        }
    }

    /// Simulate one display refresh if a loop is active.
    fn pump(&self, now: f64) {
        if let Some((sim, renderer)) = &self.running {
            drive_frame(sim, renderer, now).unwrap();
        }
    }
}

impl Platform for FakePlatform {
    type Renderer = FakeRenderer;
    type Listener = InputKind;
    type Loop = ();

    fn scroll_snapshot(&self) -> ScrollInput {
        ScrollInput::new(0.0, 4000.0, 800.0)
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(1000, 800)
    }

    fn listen(
        &mut self,
        kind: InputKind,
        _sim: &Shared<HeroSimulation>,
    ) -> Result<InputKind, SceneError> {
        if self.fail_listen == Some(kind) {
            return Err(SceneError::Listener {
                kind,
                reason: "blocked".into(),
            });
        }
        self.counters.borrow_mut().listeners += 1;
        Ok(kind)
    }

    fn unlisten(&mut self, _listener: InputKind) {
        let mut c = self.counters.borrow_mut();
        c.listeners -= 1;
        c.log.push("unlisten");
    }

    fn start_loop(
        &mut self,
        sim: &Shared<HeroSimulation>,
        renderer: &Shared<FakeRenderer>,
    ) -> Result<(), SceneError> {
        if self.fail_loop {
            return Err(SceneError::FrameLoop("no raf".into()));
        }
        self.counters.borrow_mut().loops += 1;
        self.running = Some((sim.clone(), renderer.clone()));
        Ok(())
    }

    fn stop_loop(&mut self, _handle: ()) {
        self.running = None;
        let mut c = self.counters.borrow_mut();
        c.loops -= 1;
        c.log.push("stop_loop");
    }
}

fn renderer(counters: &Rc<RefCell<Counters>>) -> Result<FakeRenderer, SceneError> {
    Ok(FakeRenderer {
        counters: counters.clone(),
        fail_upload: false,
        released: false,
    })
}

fn lifecycle() -> (Lifecycle<FakePlatform>, Rc<RefCell<Counters>>) {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let lc = Lifecycle::new(FakePlatform::new(counters.clone()), SceneConfig::compact());
    (lc, counters)
}

#[test]
fn mount_registers_everything_and_draws() {
    let (mut lc, counters) = lifecycle();
    let mut rng = SeededRandom::new(1);
    assert!(lc.mount(renderer(&counters), &mut rng).is_running());
    assert!(lc.is_mounted());
    {
        let c = counters.borrow();
        assert_eq!(c.listeners, InputKind::ALL.len());
        assert_eq!(c.loops, 1);
        assert_eq!(c.uploads, 1);
    }
    lc.platform().pump(0.0);
    lc.platform().pump(0.016);
    assert_eq!(counters.borrow().draws, 2);
    assert_eq!(lc.simulation().unwrap().borrow().ticks(), 2);
}

#[test]
fn unmount_order_is_loop_listeners_renderer() {
    let (mut lc, counters) = lifecycle();
    let mut rng = SeededRandom::new(1);
    lc.mount(renderer(&counters), &mut rng);
    lc.unmount();
    let c = counters.borrow();
    assert_eq!(c.log, vec!["stop_loop", "unlisten", "unlisten", "unlisten", "release"]);
}

#[test]
fn remount_leaves_nothing_behind() {
    let (mut lc, counters) = lifecycle();
    let mut rng = SeededRandom::new(1);
    lc.mount(renderer(&counters), &mut rng);
    lc.unmount();
    lc.mount(renderer(&counters), &mut rng);
    lc.unmount();
    let c = counters.borrow();
    assert_eq!(c.listeners, 0);
    assert_eq!(c.loops, 0);
    assert_eq!(c.releases, 2);
}

#[test]
fn mount_while_mounted_tears_down_first() {
    let (mut lc, counters) = lifecycle();
    let mut rng = SeededRandom::new(1);
    lc.mount(renderer(&counters), &mut rng);
    lc.mount(renderer(&counters), &mut rng);
    {
        let c = counters.borrow();
        assert_eq!(c.listeners, 3);
        assert_eq!(c.loops, 1);
        assert_eq!(c.releases, 1);
    }
    drop(lc);
    let c = counters.borrow();
    assert_eq!(c.listeners, 0);
    assert_eq!(c.loops, 0);
}

#[test]
fn unmount_without_mount_is_a_no_op() {
    let (mut lc, counters) = lifecycle();
    lc.unmount();
    lc.unmount();
    assert!(counters.borrow().log.is_empty());
}

#[test]
fn missing_context_skips_scene_generation() {
    let (mut lc, counters) = lifecycle();
    let mut rng = SeededRandom::new(1);
    let out = lc.mount(Err(SceneError::ContextUnavailable("no adapter".into())), &mut rng);
    assert!(matches!(out, MountOutcome::Degraded(SceneError::ContextUnavailable(_))));
    assert!(!lc.is_mounted());
    let c = counters.borrow();
    assert_eq!(c.uploads, 0);
    assert_eq!(c.listeners, 0);
}

#[test]
fn failed_upload_releases_renderer() {
    let (mut lc, counters) = lifecycle();
    let mut rng = SeededRandom::new(1);
    let r = FakeRenderer {
        counters: counters.clone(),
        fail_upload: true,
        released: false,
    };
    assert!(!lc.mount(Ok(r), &mut rng).is_running());
    assert_eq!(counters.borrow().releases, 1);
    assert_eq!(counters.borrow().listeners, 0);
}

#[test]
fn invalid_config_degrades_instead_of_panicking() {
    let (mut lc, counters) = lifecycle();
    let mut cfg = SceneConfig::compact();
    cfg.stars.layers = 0;
    lc.set_config(cfg);
    let mut rng = SeededRandom::new(1);
    let out = lc.mount(renderer(&counters), &mut rng);
    assert!(matches!(out, MountOutcome::Degraded(SceneError::InvalidParameter { .. })));
    assert_eq!(counters.borrow().releases, 1);
}

#[test]
fn listener_failure_rolls_back_partial_registration() {
    let (mut lc, counters) = lifecycle();
    lc.platform_mut().fail_listen = Some(InputKind::Pointer);
    let mut rng = SeededRandom::new(1);
    let out = lc.mount(renderer(&counters), &mut rng);
    assert!(matches!(out, MountOutcome::Degraded(SceneError::Listener { kind: InputKind::Pointer, .. })));
    let c = counters.borrow();
    assert_eq!(c.listeners, 0);
    assert_eq!(c.loops, 0);
    assert_eq!(c.releases, 1);
}

#[test]
fn loop_failure_rolls_back_listeners() {
    let (mut lc, counters) = lifecycle();
    lc.platform_mut().fail_loop = true;
    let mut rng = SeededRandom::new(1);
    assert!(!lc.mount(renderer(&counters), &mut rng).is_running());
    let c = counters.borrow();
    assert_eq!(c.listeners, 0);
    assert_eq!(c.releases, 1);
}

#[test]
fn no_frames_after_unmount() {
    let (mut lc, counters) = lifecycle();
    let mut rng = SeededRandom::new(1);
    lc.mount(renderer(&counters), &mut rng);
    lc.platform().pump(0.0);
    lc.unmount();
    lc.platform().pump(0.016);
    assert_eq!(counters.borrow().draws, 1);
}

#[test]
fn drive_frame_skips_degenerate_viewport() {
    let counters = Rc::new(RefCell::new(Counters::default()));
    let sim = shared(HeroSimulation::new(&SceneConfig::compact(), Viewport::new(0, 600)));
    let r = shared(renderer(&counters).unwrap());
    drive_frame(&sim, &r, 0.0).unwrap();
    assert_eq!(counters.borrow().draws, 0);
    assert_eq!(sim.borrow().ticks(), 1);
}
