// Host-side tests for GPU-facing data layout and shader entry points.
// No device is created; the uniform structs are included directly.

#![allow(dead_code)]
mod uniforms {
    include!("../src/uniforms.rs");
}

use skyline_core::{HeroSimulation, Lights, SceneConfig, Viewport};
use uniforms::*;

#[test]
fn uniform_structs_match_wgsl_sizes() {
    assert_eq!(std::mem::size_of::<Globals>(), 288);
    assert_eq!(std::mem::size_of::<ObjectUniforms>(), 160);
    assert_eq!(std::mem::size_of::<PostUniforms>(), 32);
    for size in [
        std::mem::size_of::<Globals>(),
        std::mem::size_of::<ObjectUniforms>(),
        std::mem::size_of::<PostUniforms>(),
    ] {
        assert_eq!(size % 16, 0);
    }
}

#[test]
fn vertex_layouts_cover_their_structs() {
    assert_eq!(MeshVertex::layout().array_stride, 32);
    assert_eq!(StarInstance::layout().array_stride, 32);
    assert_eq!(StarInstance::layout().step_mode, wgpu::VertexStepMode::Instance);
    let last = MeshVertex::ATTRIBS[2];
    assert_eq!(last.offset + last.format.size(), 32);
}

#[test]
fn globals_pack_frame_values() {
    let cfg = SceneConfig::hero();
    let mut sim = HeroSimulation::new(&cfg, Viewport::new(1280, 720));
    sim.tick(0.0);
    let frame = sim.tick(2.0);
    let lights = Lights::default();
    let g = Globals::from_frame(&frame, &lights);

    assert_eq!(g.viewport[0], 1280.0);
    assert_eq!(g.viewport[1], 720.0);
    assert_eq!(g.camera_pos[3], frame.star_time);
    assert_eq!(g.viewport[2], frame.nebula_time);
    assert_eq!(g.viewport[3], frame.atmosphere_pulse);
    assert_eq!(g.sun_pos[3], 4.0);
    assert_eq!(g.view_proj, frame.view_projection.to_cols_array_2d());
}

#[test]
fn degenerate_viewport_never_divides_by_zero() {
    let cfg = SceneConfig::compact();
    let mut sim = HeroSimulation::new(&cfg, Viewport::new(0, 0));
    let g = Globals::from_frame(&sim.tick(0.0), &Lights::default());
    assert!(g.viewport[0] >= 1.0 && g.viewport[1] >= 1.0);
}

#[test]
fn object_uniforms_builders() {
    let palette = [[0.1, 0.2, 0.3]; 4];
    let u = ObjectUniforms::new(glam::Mat4::IDENTITY, [0.5, 0.5, 0.5], 0.3)
        .with_params([1.0, 2.0, 0.0, 0.0])
        .with_palette(&palette);
    assert_eq!(u.color, [0.5, 0.5, 0.5, 0.3]);
    assert_eq!(u.params[1], 2.0);
    assert_eq!(u.palette[3], [0.1, 0.2, 0.3, 1.0]);
}

#[test]
fn shaders_define_every_pipeline_entry_point() {
    for entry in [
        "fn vs_star",
        "fn fs_star",
        "fn vs_nebula",
        "fn fs_nebula",
        "fn vs_mesh",
        "fn fs_moon",
        "fn fs_glow",
        "fn fs_atmosphere",
        "fn fs_flat",
    ] {
        assert!(skyline_render::SCENE_WGSL.contains(entry), "missing {entry}");
    }
    for entry in ["fn vs_fullscreen", "fn fs_bright", "fn fs_blur", "fn fs_composite"] {
        assert!(skyline_render::POST_WGSL.contains(entry), "missing {entry}");
    }
}
