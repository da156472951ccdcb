use glam::Vec3;

use crate::config::MoonConfig;
use crate::error::SceneError;
use crate::geometry::{uv_sphere, Mesh};

// (frequency, amplitude) from coarse relief down to small craters.
const CRATER_OCTAVES: [(f32, f32); 5] = [
    (2.0, 1.0),
    (5.0, 0.5),
    (11.0, 0.25),
    (23.0, 0.125),
    (47.0, 0.0625),
];

/// Sum of the five octaves at unit direction `dir`. Bounded by the sum of
/// amplitudes, i.e. `|d| < 2`.
pub fn crater_displacement(dir: Vec3) -> f32 {
    CRATER_OCTAVES
        .iter()
        .enumerate()
        .map(|(i, &(f, a))| {
            let shift = i as f32 * 1.7;
            a * (dir.x * f + shift).sin() * (dir.y * f * 1.3).cos() * (dir.z * f * 0.7 + shift).sin()
        })
        .sum()
}

/// Displaced UV sphere. Each vertex moves along its own direction by
/// `crater_displacement * crater_depth * radius`, then normals are rebuilt.
pub fn generate_moon(cfg: &MoonConfig) -> Result<Mesh, SceneError> {
    cfg.validate()?;
    let mut mesh = uv_sphere(cfg.radius, cfg.width_segments, cfg.height_segments)?;
    let scale = cfg.crater_depth * cfg.radius;

    // Seam and pole vertices share a direction, so they move identically and
    // the surface stays closed.
    for p in mesh.positions.iter_mut() {
        let v = Vec3::from(*p);
        let dir = v.normalize_or_zero();
        let d = crater_displacement(dir) * scale;
        *p = (v + dir * d).to_array();
    }
    mesh.recompute_normals();
    Ok(mesh)
}
