use crate::config::NebulaConfig;
use crate::error::SceneError;
use crate::geometry::{plane_grid, Mesh};

/// Flat grid for the nebula backdrop. Elevation is applied in the vertex
/// shader from [`nebula_elevation`], so the stored grid stays flat.
pub fn generate_nebula(cfg: &NebulaConfig) -> Result<Mesh, SceneError> {
    cfg.validate()?;
    plane_grid(cfg.width, cfg.height, cfg.segments)
}

/// Vertex displacement along z for the nebula at shader time `t`.
#[inline]
pub fn nebula_elevation(x: f32, y: f32, t: f32) -> f32 {
    (x * 0.008 + t * 0.3).sin() * (y * 0.008 + t * 0.2).cos() * 30.0
        + (x * 0.015 + t * 0.5).sin() * (y * 0.012 + t * 0.4).cos() * 15.0
}
