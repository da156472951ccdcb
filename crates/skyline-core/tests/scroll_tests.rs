// Host-side tests for the scroll-to-camera mapper.

use skyline_core::config::SceneConfig;
use skyline_core::easing::ease_in_out_cubic;
use skyline_core::scroll::{
    locate_section, mountain_depths, scroll_progress, segment_count, target_pose,
};
use skyline_core::{CameraPose, ScrollInput, ScrollMapper, Waypoint};

fn four_waypoints() -> Vec<Waypoint> {
    vec![
        Waypoint {
            name: "a",
            pose: CameraPose::new(0.0, 30.0, 300.0, 0.0, 0.0),
        },
        Waypoint {
            name: "b",
            pose: CameraPose::new(-40.0, 50.0, 50.0, 0.15, -0.12),
        },
        Waypoint {
            name: "c",
            pose: CameraPose::new(50.0, 65.0, -300.0, -0.08, 0.18),
        },
        Waypoint {
            name: "d",
            pose: CameraPose::new(-30.0, 75.0, -700.0, 0.12, -0.08),
        },
    ]
}

#[test]
fn progress_stays_in_unit_range() {
    for i in 0..=400 {
        let y = i as f32 * 10.0;
        let p = scroll_progress(y, 4800.0, 800.0);
        assert!((0.0..=1.0).contains(&p), "progress {p} at scroll {y}");
    }
    assert_eq!(scroll_progress(-50.0, 4800.0, 800.0), 0.0);
    assert_eq!(scroll_progress(9000.0, 4800.0, 800.0), 1.0);
}

#[test]
fn progress_is_zero_when_page_does_not_scroll() {
    assert_eq!(scroll_progress(0.0, 800.0, 800.0), 0.0);
    assert_eq!(scroll_progress(120.0, 800.0, 800.0), 0.0);
    // Content shorter than the viewport.
    assert_eq!(scroll_progress(10.0, 600.0, 800.0), 0.0);
    assert!(!scroll_progress(f32::NAN, 4800.0, 800.0).is_nan());
}

#[test]
fn section_never_leaves_range() {
    for i in 0..=1000 {
        let p = i as f32 / 1000.0;
        let (section, t) = locate_section(p, 4);
        assert!(section <= 3);
        assert!((0.0..=1.0).contains(&t));
    }
    assert_eq!(locate_section(1.0, 4), (3, 1.0));
    assert_eq!(locate_section(0.75, 4), (3, 0.0));
    assert_eq!(locate_section(0.0, 0), (0, 0.0));
}

#[test]
fn example_viewport_scenario() {
    // 1000x800 viewport, 4 page heights of content, four waypoints.
    let wps = four_waypoints();
    let at_top = target_pose(&wps, scroll_progress(0.0, 4800.0, 800.0));
    assert_eq!(at_top, wps[0].pose);

    let at_bottom = target_pose(&wps, scroll_progress(4000.0, 4800.0, 800.0));
    assert_eq!(locate_section(1.0, segment_count(wps.len())), (2, 1.0));
    assert_eq!(at_bottom, wps[3].pose);
}

#[test]
fn target_is_bounded_by_its_two_waypoints() {
    let wps = four_waypoints();
    for i in 0..=500 {
        let p = i as f32 / 500.0;
        let (section, _) = locate_section(p, segment_count(wps.len()));
        let a = wps[section].pose;
        let b = wps[(section + 1).min(wps.len() - 1)].pose;
        let t = target_pose(&wps, p);

        let check = |v: f32, lo: f32, hi: f32| {
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            assert!(v >= lo - 1e-4 && v <= hi + 1e-4, "{v} outside [{lo}, {hi}] at p={p}");
        };
        check(t.position.x, a.position.x, b.position.x);
        check(t.position.y, a.position.y, b.position.y);
        check(t.position.z, a.position.z, b.position.z);
        check(t.rotation.x, a.rotation.x, b.rotation.x);
        check(t.rotation.y, a.rotation.y, b.rotation.y);
    }
}

#[test]
fn midpoint_of_a_segment_uses_eased_half() {
    let wps = four_waypoints();
    // three segments: progress 1/6 -> section 0, t = 0.5, eased 0.5
    let t = target_pose(&wps, 1.0 / 6.0);
    let expected = wps[0].pose.lerp(&wps[1].pose, 0.5);
    assert!(t.max_abs_diff(&expected) < 1e-4);
}

#[test]
fn segment_count_spans_adjacent_pairs() {
    assert_eq!(segment_count(5), 4);
    assert_eq!(segment_count(2), 1);
    assert_eq!(segment_count(1), 1);
    assert_eq!(segment_count(0), 1);
}

#[test]
fn hero_camera_keeps_moving_until_the_end_of_the_page() {
    let wps = SceneConfig::hero().waypoints;
    assert_eq!(wps.len(), 5);
    // Each quarter of the page ends on the next waypoint.
    for (i, p) in [0.25, 0.5, 0.75, 1.0].into_iter().enumerate() {
        let t = target_pose(&wps, p);
        assert!(
            t.max_abs_diff(&wps[i + 1].pose) < 1e-3,
            "progress {p} should land on {}",
            wps[i + 1].name
        );
    }
    let late = target_pose(&wps, 0.9);
    assert!(late.position.z > wps[4].pose.position.z);
    assert!(late.position.z < wps[3].pose.position.z);
}

#[test]
fn compact_camera_blends_across_the_whole_page() {
    let wps = SceneConfig::compact().waypoints;
    assert_eq!(wps.len(), 2);
    let a = wps[0].pose.position.z;
    let b = wps[1].pose.position.z;
    let mid = target_pose(&wps, 0.5).position.z;
    assert!((mid - (a + b) / 2.0).abs() < 1e-3);
    let three_quarters = target_pose(&wps, 0.75).position.z;
    assert!(three_quarters != b);
    assert_eq!(target_pose(&wps, 1.0), wps[1].pose);
}

#[test]
fn easing_boundaries_and_monotonicity() {
    assert_eq!(ease_in_out_cubic(0.0), 0.0);
    assert_eq!(ease_in_out_cubic(1.0), 1.0);
    assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    let mut prev = 0.0;
    for i in 0..=1000 {
        let v = ease_in_out_cubic(i as f32 / 1000.0);
        assert!(v >= prev - 1e-6);
        prev = v;
    }
}

#[test]
fn mountain_layers_never_overtake() {
    for cfg in [SceneConfig::hero(), SceneConfig::compact()] {
        for i in 0..=200 {
            let y = i as f32 * 50.0;
            let depths = mountain_depths(&cfg.mountains, y);
            for pair in depths.windows(2) {
                assert!(pair[0] <= pair[1], "order broken at scroll {y}: {depths:?}");
            }
        }
    }
}

#[test]
fn mountain_depth_follows_speed_table() {
    let cfg = SceneConfig::hero();
    let depths = mountain_depths(&cfg.mountains, 100.0);
    // front layer: -50 + 100 * 3.2 * 0.4
    assert!((depths[4] - 78.0).abs() < 1e-3);
    // back layer: -530 + 100 * 0.8 * 0.4
    assert!((depths[0] + 498.0).abs() < 1e-3);
}

#[test]
fn mapper_publishes_nebula_and_moon_offsets() {
    let cfg = SceneConfig::hero();
    let mapper = ScrollMapper::new(&cfg);

    let top = mapper.map(&ScrollInput::new(0.0, 4000.0, 800.0));
    assert_eq!(top.progress, 0.0);
    assert_eq!(top.moon_offset_x, 0.0);
    assert_eq!(top.moon_roll, 0.0);
    assert!((top.nebula_z - (-530.0 - 80.0)).abs() < 1e-3);

    let mid = mapper.map(&ScrollInput::new(1600.0, 4000.0, 800.0));
    assert!((mid.progress - 0.5).abs() < 1e-6);
    assert!((mid.moon_offset_x - 10.0).abs() < 1e-4);

    let compact = SceneConfig::compact();
    let frame = ScrollMapper::new(&compact).map(&ScrollInput::new(500.0, 4000.0, 800.0));
    assert_eq!(frame.nebula_z, compact.nebula.z);
}
