use crate::config::{MountainConfig, MountainLayerConfig};
use crate::constants::{
    MOUNTAIN_BASELINE_EXTENT, MOUNTAIN_BASELINE_Y, MOUNTAIN_RANDOM_FRACTION, MOUNTAIN_RIDGE_BIAS,
};
use crate::error::{ensure_count, ensure_positive, SceneError};
use crate::geometry::Mesh;
use crate::random::RandomSource;

/// A filled silhouette plus the anchors the scroll mapper offsets from.
#[derive(Clone, Debug, PartialEq)]
pub struct MountainLayer {
    /// Position in the back-to-front table.
    pub index: usize,
    /// 0 for the frontmost layer.
    pub rank_from_front: u32,
    pub base_depth: f32,
    pub speed: f32,
    pub color: [f32; 3],
    pub opacity: f32,
    /// Ridge points left to right, then the two baseline points.
    pub outline: Vec<[f32; 2]>,
    pub mesh: Mesh,
}

/// Ridge line for one layer, closed with the two far baseline points
/// `(+E, B)` and `(-E, B)`.
///
/// `rank` is the layer's position counted from the front; it shifts the
/// phase of each sinusoid so neighbouring ridges do not line up.
pub fn mountain_profile(
    layer: &MountainLayerConfig,
    rank: u32,
    segments: u32,
    span: f32,
    rng: &mut dyn RandomSource,
) -> Result<Vec<[f32; 2]>, SceneError> {
    ensure_count("mountains.segments", segments)?;
    ensure_positive("mountains.span", span)?;
    ensure_positive("mountains.height", layer.height)?;
    ensure_positive("mountains.roughness", layer.roughness)?;

    let h = layer.height;
    let r = layer.roughness;
    let o = layer.phase_offset;
    let k = rank as f32;

    let mut points = Vec::with_capacity(segments as usize + 3);
    for i in 0..=segments {
        let fi = i as f32;
        let x = (fi / segments as f32 - 0.5) * span;

        let broad = (fi * 0.08 + k * 2.5 + o).sin() * h * r;
        let swell = (fi * 0.04 + k * 1.2 + o).sin() * h * 0.6 * r;
        let detail = (fi * 0.15 + k * 3.5 + o).sin() * h * 0.4;
        let jitter = rng.next_unit() * h * MOUNTAIN_RANDOM_FRACTION * r;
        let roll = (fi * 0.12 + o).cos() * h * 0.5 * r;
        let peaks = (fi * 0.25 + k * 2.0).sin() * h * 0.3;

        let y = broad + swell + detail + jitter + roll + peaks + MOUNTAIN_RIDGE_BIAS;
        points.push([x, y]);
    }
    points.push([MOUNTAIN_BASELINE_EXTENT, MOUNTAIN_BASELINE_Y]);
    points.push([-MOUNTAIN_BASELINE_EXTENT, MOUNTAIN_BASELINE_Y]);
    Ok(points)
}

/// Fill the closed outline: one quad per ridge column down to the baseline,
/// plus a side triangle out to each far baseline point.
fn fill_outline(outline: &[[f32; 2]]) -> Mesh {
    let ridge = &outline[..outline.len() - 2];
    let right_far = outline[outline.len() - 2];
    let left_far = outline[outline.len() - 1];
    let n = ridge.len() as u32;

    let mut mesh = Mesh::default();
    for p in ridge {
        mesh.positions.push([p[0], p[1], 0.0]);
    }
    for p in ridge {
        mesh.positions.push([p[0], MOUNTAIN_BASELINE_Y, 0.0]);
    }
    mesh.positions.push([right_far[0], right_far[1], 0.0]);
    mesh.positions.push([left_far[0], left_far[1], 0.0]);

    for i in 0..n - 1 {
        let top = i;
        let top_next = i + 1;
        let bottom = n + i;
        let bottom_next = n + i + 1;
        mesh.indices
            .extend_from_slice(&[top, bottom, top_next, top_next, bottom, bottom_next]);
    }
    let right = 2 * n;
    let left = 2 * n + 1;
    mesh.indices.extend_from_slice(&[n - 1, 2 * n - 1, right]);
    mesh.indices.extend_from_slice(&[0, left, n]);

    mesh.normals = vec![[0.0, 0.0, 1.0]; mesh.positions.len()];
    mesh
}

/// Build layer `index` of the back-to-front table.
pub fn generate_mountain_layer(
    cfg: &MountainConfig,
    index: usize,
    rng: &mut dyn RandomSource,
) -> Result<MountainLayer, SceneError> {
    let layer = cfg.layers.get(index).ok_or_else(|| {
        SceneError::invalid(
            "mountains.layer",
            format!("layer {index} out of range for {} layers", cfg.layers.len()),
        )
    })?;
    let rank = (cfg.layers.len() - 1 - index) as u32;
    let outline = mountain_profile(layer, rank, cfg.segments, cfg.span, rng)?;
    let mesh = fill_outline(&outline);

    Ok(MountainLayer {
        index,
        rank_from_front: rank,
        base_depth: layer.base_depth,
        speed: layer.speed,
        color: layer.color,
        opacity: layer.opacity,
        outline,
        mesh,
    })
}
