// Host-side tests for the procedural geometry generators.

use glam::Vec3;
use skyline_core::config::{MoonConfig, SceneConfig};
use skyline_core::geometry::{
    crater_displacement, drift_angle, drift_rotate, generate_moon, generate_mountain_layer, generate_nebula,
    generate_star_layer, mountain_profile, nebula_elevation, twinkle, uv_sphere,
};
use skyline_core::{Scene, SceneError, SeededRandom, SequenceRandom};

#[test]
fn compact_star_layers_stay_in_radius_band() {
    let cfg = SceneConfig::compact();
    assert_eq!(cfg.stars.stars_per_layer, 5000);
    let mut rng = SeededRandom::new(7);
    for layer in 0..cfg.stars.layers {
        let stars = generate_star_layer(&cfg.stars, layer, &mut rng).unwrap();
        assert_eq!(stars.len(), 5000);
        for s in &stars.points {
            let d = Vec3::from(s.position).length();
            assert!(
                (200.0 - 1e-2..=1000.0 + 1e-2).contains(&d),
                "star at distance {d} in layer {layer}"
            );
        }
    }
}

#[test]
fn hero_star_layers_use_their_own_band() {
    let cfg = SceneConfig::hero();
    let mut rng = SeededRandom::new(3);
    let layer = generate_star_layer(&cfg.stars, 2, &mut rng).unwrap();
    assert_eq!(layer.radius_band, (800.0, 2000.0));
    assert_eq!(layer.center, Vec3::new(0.0, -100.0, -700.0));
    for s in &layer.points {
        let d = Vec3::from(s.position).length();
        assert!(d >= 800.0 - 1e-2 && d <= 2000.0 + 1e-2);
        assert!(s.size >= 0.5 + 0.6 - 1e-5 && s.size <= 0.5 + 0.6 + 3.0);
    }
}

#[test]
fn star_colour_buckets_follow_the_draw() {
    let cfg = SceneConfig::hero();
    // radius, theta, phi, bucket pick, jitter/size...
    let mut white = SequenceRandom::new(vec![0.5, 0.5, 0.5, 0.1, 1.0, 0.5]);
    let s = generate_star_layer(&cfg.stars, 0, &mut white).unwrap().points[0];
    assert_eq!(s.color[0], s.color[1]);
    assert_eq!(s.color[1], s.color[2]);

    let mut blue = SequenceRandom::new(vec![0.5, 0.5, 0.5, 0.7, 0.5]);
    let s = generate_star_layer(&cfg.stars, 0, &mut blue).unwrap().points[0];
    assert!(s.color[2] > s.color[0]);
}

#[test]
fn star_generation_rejects_bad_parameters() {
    let mut cfg = SceneConfig::compact().stars;
    cfg.stars_per_layer = 0;
    let mut rng = SeededRandom::new(1);
    let err = generate_star_layer(&cfg, 0, &mut rng).unwrap_err();
    assert!(matches!(err, SceneError::InvalidParameter { name: "stars.stars_per_layer", .. }));

    let cfg = SceneConfig::compact().stars;
    assert!(generate_star_layer(&cfg, cfg.layers, &mut rng).is_err());
}

#[test]
fn star_shader_helpers() {
    assert_eq!(drift_angle(0.0, 3, 0.02, 0.2), 0.0);
    // Deeper layers turn slower.
    assert!(drift_angle(10.0, 0, 0.02, 0.2) > drift_angle(10.0, 3, 0.02, 0.2));
    for i in 0..100 {
        let v = twinkle(i as f32 * 0.37, [i as f32, 2.0 * i as f32, 0.0], 0.1 * i as f32, 0.3);
        assert!((0.4 - 1e-5..=1.0 + 1e-5).contains(&v));
    }
    assert_eq!(twinkle(5.0, [1.0, 2.0, 3.0], 0.4, 0.0), 1.0);
}

#[test]
fn twinkle_phase_follows_the_drifted_position() {
    let p = [10.0, 0.0, -5.0];
    let angle = std::f32::consts::FRAC_PI_2;
    let [x, y, z] = drift_rotate(p, angle);
    assert!(x.abs() < 1e-5 && (y + 10.0).abs() < 1e-5);
    assert_eq!(z, -5.0);

    // A quarter turn carries (10, 0) to (0, -10), which flips the spatial
    // phase term.
    let t = 0.0;
    let turned = twinkle(t, p, angle, 0.3);
    let expected = (-1.0f32).sin() * 0.3 + 0.7;
    assert!((turned - expected).abs() < 1e-5, "{turned} vs {expected}");
    assert!((turned - twinkle(t, p, 0.0, 0.3)).abs() > 0.1);
    assert_eq!(twinkle(t, drift_rotate(p, angle), 0.0, 0.3), turned);
}

#[test]
fn sphere_has_expected_topology() {
    let mesh = uv_sphere(10.0, 8, 6).unwrap();
    assert_eq!(mesh.vertex_count(), 9 * 7);
    // Pole rows contribute one triangle per column, the rest two.
    assert_eq!(mesh.triangle_count(), 8 * (6 * 2 - 2));
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    assert!(uv_sphere(10.0, 2, 6).is_err());
    assert!(uv_sphere(-1.0, 8, 6).is_err());
}

#[test]
fn moon_is_displaced_within_bounds() {
    let cfg = SceneConfig::hero().moon;
    let mesh = generate_moon(&cfg).unwrap();
    let max_shift = 2.0 * cfg.crater_depth * cfg.radius;
    let mut displaced = 0;
    for p in &mesh.positions {
        let d = Vec3::from(*p).length();
        assert!((d - cfg.radius).abs() <= max_shift + 1e-3);
        if (d - cfg.radius).abs() > 1e-3 {
            displaced += 1;
        }
    }
    assert!(displaced > mesh.vertex_count() / 2);
    for n in &mesh.normals {
        assert!((Vec3::from(*n).length() - 1.0).abs() < 1e-3);
    }
}

#[test]
fn crater_noise_is_deterministic_and_bounded() {
    let dir = Vec3::new(0.3, 0.5, 0.81).normalize();
    assert_eq!(crater_displacement(dir), crater_displacement(dir));
    for i in 0..200 {
        let a = i as f32 * 0.1;
        let d = crater_displacement(Vec3::new(a.cos(), (a * 0.7).sin(), a.sin()).normalize());
        assert!(d.abs() < 2.0);
    }
}

#[test]
fn moon_rejects_bad_parameters() {
    let cfg = MoonConfig {
        width_segments: 0,
        ..SceneConfig::hero().moon
    };
    assert!(generate_moon(&cfg).is_err());
}

#[test]
fn nebula_grid_and_elevation() {
    let cfg = SceneConfig::hero().nebula;
    let mesh = generate_nebula(&cfg).unwrap();
    assert_eq!(mesh.vertex_count(), 121 * 121);
    assert_eq!(mesh.triangle_count(), 120 * 120 * 2);
    assert_eq!(nebula_elevation(0.0, 0.0, 0.0), 0.0);
    for i in 0..50 {
        let e = nebula_elevation(i as f32 * 37.0, i as f32 * -11.0, i as f32 * 0.3);
        assert!(e.abs() <= 45.0);
    }
}

#[test]
fn mountain_profile_with_pinned_randomness() {
    let cfg = SceneConfig::hero().mountains;
    let layer = &cfg.layers[4];
    let mut zero = SequenceRandom::constant(0.0);
    let outline = mountain_profile(layer, 0, cfg.segments, cfg.span, &mut zero).unwrap();
    assert_eq!(outline.len(), cfg.segments as usize + 3);
    assert_eq!(outline[0][0], -700.0);
    assert_eq!(outline[cfg.segments as usize][0], 700.0);
    assert_eq!(outline[outline.len() - 2], [6000.0, -400.0]);
    assert_eq!(outline[outline.len() - 1], [-6000.0, -400.0]);

    // First point: every sinusoid at phase 0 except the cosine roll.
    let h = layer.height;
    let expected = h * 0.5 * layer.roughness - 120.0;
    assert!((outline[0][1] - expected).abs() < 1e-3);

    let mut one = SequenceRandom::constant(0.999);
    let lifted = mountain_profile(layer, 0, cfg.segments, cfg.span, &mut one).unwrap();
    let max_jitter = h * 0.18 * layer.roughness;
    let diff = lifted[10][1] - outline[10][1];
    assert!(diff > 0.0 && diff <= max_jitter + 1e-3);
}

#[test]
fn mountain_layers_are_filled_and_ranked() {
    let cfg = SceneConfig::hero().mountains;
    let mut rng = SeededRandom::new(11);
    let back = generate_mountain_layer(&cfg, 0, &mut rng).unwrap();
    let front = generate_mountain_layer(&cfg, 4, &mut rng).unwrap();
    assert_eq!(back.rank_from_front, 4);
    assert_eq!(front.rank_from_front, 0);
    assert_eq!(back.base_depth, -530.0);
    // 100 column quads plus two side triangles.
    assert_eq!(front.mesh.triangle_count(), 100 * 2 + 2);
    assert!(generate_mountain_layer(&cfg, 5, &mut rng).is_err());
}

#[test]
fn scene_builds_every_object() {
    let cfg = SceneConfig::compact();
    let mut rng = SeededRandom::new(42);
    let scene = Scene::build(&cfg, &mut rng).unwrap();
    assert_eq!(scene.stars.len(), 3);
    assert_eq!(scene.star_count(), 15_000);
    assert_eq!(scene.mountains.len(), 4);
    assert!(scene.glow.is_none());
    assert!(scene.atmosphere.is_none());

    let mut bad = SceneConfig::compact();
    bad.waypoints.clear();
    assert!(Scene::build(&bad, &mut rng).is_err());
}
