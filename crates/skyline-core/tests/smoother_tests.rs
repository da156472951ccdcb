// Host-side tests for camera smoothing and the owned simulation.

use glam::Vec2;
use skyline_core::smoother::idle_float;
use skyline_core::{
    CameraPose, CameraSmoother, HeroSimulation, SceneConfig, ScrollInput, Smoothing, Viewport,
};

#[test]
fn per_tick_smoothing_converges() {
    let start = CameraPose::new(0.0, 30.0, 300.0, 0.0, 0.0);
    let target = CameraPose::new(-30.0, 75.0, -700.0, 0.12, -0.08);
    let mut s = CameraSmoother::new(start, Smoothing::PerTick { factor: 0.05 });
    for _ in 0..200 {
        s.update(&target, 1.0 / 60.0);
    }
    assert!(s.current().max_abs_diff(&target) < 0.1);

    // 0.04 needs a few more ticks for the same distance.
    let mut slow = CameraSmoother::new(start, Smoothing::PerTick { factor: 0.04 });
    let mut prev = slow.current().max_abs_diff(&target);
    for _ in 0..300 {
        slow.update(&target, 1.0 / 60.0);
        let d = slow.current().max_abs_diff(&target);
        assert!(d <= prev);
        prev = d;
    }
    assert!(prev < 0.01);
}

#[test]
fn per_tick_ignores_frame_time() {
    let start = CameraPose::default();
    let target = CameraPose::new(100.0, 0.0, 0.0, 0.0, 0.0);
    let mut a = CameraSmoother::new(start, Smoothing::PerTick { factor: 0.04 });
    let mut b = a.clone();
    a.update(&target, 1.0 / 144.0);
    b.update(&target, 1.0 / 30.0);
    assert_eq!(a.current(), b.current());
}

#[test]
fn time_constant_smoothing_is_frame_rate_independent() {
    let start = CameraPose::default();
    let target = CameraPose::new(100.0, 0.0, 0.0, 0.0, 0.0);
    let mode = Smoothing::TimeConstant { tau_sec: 0.4 };

    let mut fast = CameraSmoother::new(start, mode);
    for _ in 0..120 {
        fast.update(&target, 1.0 / 120.0);
    }
    let mut slow = CameraSmoother::new(start, mode);
    for _ in 0..30 {
        slow.update(&target, 1.0 / 30.0);
    }
    assert!((fast.current().position.x - slow.current().position.x).abs() < 0.05);
    assert_eq!(mode.blend(0.0), 0.0);
}

#[test]
fn smoothing_validation() {
    assert!(Smoothing::PerTick { factor: 0.04 }.validate().is_ok());
    assert!(Smoothing::PerTick { factor: 1.0 }.validate().is_ok());
    assert!(Smoothing::PerTick { factor: 0.0 }.validate().is_err());
    assert!(Smoothing::PerTick { factor: 1.5 }.validate().is_err());
    assert!(Smoothing::TimeConstant { tau_sec: 0.0 }.validate().is_err());
}

#[test]
fn compose_adds_bounded_float_and_pointer() {
    let pose = CameraPose::new(10.0, 20.0, 30.0, 0.1, 0.2);
    let s = CameraSmoother::new(pose, Smoothing::PerTick { factor: 0.04 }).with_pointer(true, 0.02);
    for i in 0..100 {
        let t = i as f32 * 1.7;
        let out = s.compose(t, Vec2::new(5.0, -5.0));
        assert!((out.position.x - 10.0).abs() <= 3.0 + 0.02 + 1e-4);
        assert!((out.position.y - 20.0).abs() <= 2.0 + 0.02 + 1e-4);
        assert_eq!(out.position.z, 30.0);
        assert_eq!(out.rotation, pose.rotation);
    }
    // compose never feeds back into the smoothed pose
    assert_eq!(s.current(), pose);

    let f = idle_float(0.0);
    assert_eq!(f, Vec2::new(0.0, 2.0));
}

#[test]
fn simulation_starts_on_first_waypoint() {
    let cfg = SceneConfig::hero();
    let sim = HeroSimulation::new(&cfg, Viewport::new(1000, 800));
    assert_eq!(sim.current(), cfg.waypoints[0].pose);
    assert_eq!(sim.target(), cfg.waypoints[0].pose);
    assert_eq!(sim.time(), 0.0);
}

#[test]
fn simulation_time_is_monotonic_from_first_tick() {
    let cfg = SceneConfig::compact();
    let mut sim = HeroSimulation::new(&cfg, Viewport::new(800, 600));
    let f0 = sim.tick(1_000.0);
    assert_eq!(f0.time, 0.0);
    let f1 = sim.tick(1_000.5);
    assert!((f1.time - 0.5).abs() < 1e-4);
    // Clock going backwards does not rewind time.
    let f2 = sim.tick(999.0);
    assert!(f2.time >= f1.time);
    assert_eq!(sim.ticks(), 3);
}

#[test]
fn simulation_chases_latest_scroll_target() {
    let cfg = SceneConfig::hero();
    let mut sim = HeroSimulation::new(&cfg, Viewport::new(1000, 800));
    // Several scroll events between ticks: last one wins.
    sim.on_scroll(ScrollInput::new(500.0, 4800.0, 800.0));
    sim.on_scroll(ScrollInput::new(4000.0, 4800.0, 800.0));
    let last = cfg.waypoints[cfg.waypoints.len() - 1].pose;
    assert_eq!(sim.target(), last);

    let mut t = 0.0;
    for _ in 0..400 {
        sim.tick(t);
        t += 1.0 / 60.0;
    }
    assert!(sim.current().max_abs_diff(&last) < 0.01);
}

#[test]
fn frame_state_reflects_scroll_and_viewport() {
    let cfg = SceneConfig::hero();
    let mut sim = HeroSimulation::new(&cfg, Viewport::new(1000, 800));
    sim.on_scroll(ScrollInput::new(100.0, 4800.0, 800.0));
    sim.on_resize(Viewport::new(0, 0));
    let frame = sim.tick(0.0);
    assert_eq!(frame.mountain_offsets.len(), 5);
    assert!((frame.mountain_offsets[4].z - 78.0).abs() < 1e-3);
    assert!(frame.view_projection.is_finite());
    assert_eq!(frame.nebula_time, 0.0);
    assert!((frame.atmosphere_pulse - 0.92).abs() < 1e-6);
}
