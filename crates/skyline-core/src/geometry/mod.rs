//! Procedural geometry generators.
//!
//! Everything here is pure: parameters plus a [`RandomSource`](crate::RandomSource)
//! in, buffers out. Bad parameters fail with
//! [`SceneError::InvalidParameter`](crate::SceneError) instead of yielding
//! empty geometry.

pub mod moon;
pub mod mountains;
pub mod nebula;
pub mod stars;

use glam::Vec3;

use crate::error::{ensure_positive, SceneError};

pub use moon::{crater_displacement, generate_moon};
pub use mountains::{generate_mountain_layer, mountain_profile, MountainLayer};
pub use nebula::{generate_nebula, nebula_elevation};
pub use stars::{drift_angle, drift_rotate, generate_star_layer, twinkle, StarLayer, StarPoint};

/// Indexed triangle mesh. `normals` and `uvs` are either empty or one per
/// position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Area-weighted vertex normals from the current triangles.
    pub fn recompute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let pa = Vec3::from(self.positions[a]);
            let pb = Vec3::from(self.positions[b]);
            let pc = Vec3::from(self.positions[c]);
            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        self.normals = acc
            .into_iter()
            .zip(&self.positions)
            .map(|(n, p)| {
                // Poles collapse to zero-area fans; fall back to the radial direction.
                let n = n.try_normalize().unwrap_or_else(|| Vec3::from(*p).normalize_or_zero());
                n.to_array()
            })
            .collect();
    }
}

/// UV sphere centred on the origin, counter-clockwise outward winding.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Result<Mesh, SceneError> {
    ensure_positive("sphere.radius", radius)?;
    if width_segments < 3 || height_segments < 2 {
        return Err(SceneError::invalid(
            "sphere.segments",
            format!("need at least 3x2 segments, got {width_segments}x{height_segments}"),
        ));
    }

    let cols = width_segments + 1;
    let rows = height_segments + 1;
    let mut mesh = Mesh {
        positions: Vec::with_capacity((cols * rows) as usize),
        normals: Vec::with_capacity((cols * rows) as usize),
        uvs: Vec::with_capacity((cols * rows) as usize),
        indices: Vec::with_capacity((width_segments * height_segments * 6) as usize),
    };

    for iy in 0..rows {
        let v = iy as f32 / height_segments as f32;
        let phi = v * std::f32::consts::PI;
        for ix in 0..cols {
            let u = ix as f32 / width_segments as f32;
            let theta = u * std::f32::consts::TAU;
            let dir = Vec3::new(-theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            mesh.positions.push((dir * radius).to_array());
            mesh.normals.push(dir.to_array());
            mesh.uvs.push([u, 1.0 - v]);
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * cols + ix + 1;
            let b = iy * cols + ix;
            let c = (iy + 1) * cols + ix;
            let d = (iy + 1) * cols + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Ok(mesh)
}

/// Flat grid in the xy plane centred on the origin, facing +z.
pub fn plane_grid(width: f32, height: f32, segments: u32) -> Result<Mesh, SceneError> {
    ensure_positive("plane.width", width)?;
    ensure_positive("plane.height", height)?;
    if segments == 0 {
        return Err(SceneError::invalid("plane.segments", "must be at least 1"));
    }

    let n = segments + 1;
    let mut mesh = Mesh::default();
    for iy in 0..n {
        let v = iy as f32 / segments as f32;
        for ix in 0..n {
            let u = ix as f32 / segments as f32;
            mesh.positions
                .push([(u - 0.5) * width, (0.5 - v) * height, 0.0]);
            mesh.normals.push([0.0, 0.0, 1.0]);
            mesh.uvs.push([u, 1.0 - v]);
        }
    }
    for iy in 0..segments {
        for ix in 0..segments {
            let a = iy * n + ix;
            let b = (iy + 1) * n + ix;
            let c = (iy + 1) * n + ix + 1;
            let d = iy * n + ix + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    Ok(mesh)
}
