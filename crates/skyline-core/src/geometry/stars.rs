use glam::Vec3;

use crate::color::hsl_to_rgb;
use crate::config::StarFieldConfig;
use crate::constants::{STAR_TWINKLE_RATE, STAR_TWINKLE_SPATIAL};
use crate::error::SceneError;
use crate::random::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarPoint {
    /// Relative to the layer centre.
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub size: f32,
}

/// One depth layer of the star field. Geometry is immutable after creation;
/// only the shared time uniform changes per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct StarLayer {
    pub depth_index: u32,
    pub center: Vec3,
    pub radius_band: (f32, f32),
    pub points: Vec<StarPoint>,
}

impl StarLayer {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sample one layer: uniform directions on the sphere (inverse-CDF in
/// `cos(phi)`), radius uniform in the layer band, bucketed colour and a
/// random size.
pub fn generate_star_layer(
    cfg: &StarFieldConfig,
    layer: u32,
    rng: &mut dyn RandomSource,
) -> Result<StarLayer, SceneError> {
    cfg.validate()?;
    if layer >= cfg.layers {
        return Err(SceneError::invalid(
            "stars.layer",
            format!("layer {layer} out of range for {} layers", cfg.layers),
        ));
    }

    let (r_lo, r_hi) = cfg.radius_band(layer);
    let size_base = cfg.size_min + cfg.layer_size_step * layer as f32;
    let mut points = Vec::with_capacity(cfg.stars_per_layer as usize);

    for _ in 0..cfg.stars_per_layer {
        let radius = (r_lo + rng.next_unit() * cfg.radius_range).clamp(r_lo, r_hi);
        let theta = rng.next_unit() * std::f32::consts::TAU;
        let phi = rng.range(-1.0, 1.0).clamp(-1.0, 1.0).acos();
        let position = Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        );

        let pick = rng.next_unit();
        let bucket = cfg
            .buckets
            .iter()
            .find(|b| pick < b.cumulative)
            .or(cfg.buckets.last())
            .ok_or_else(|| SceneError::invalid("stars.buckets", "no colour buckets"))?;
        let jitter = if bucket.lightness_jitter > 0.0 {
            rng.next_unit() * bucket.lightness_jitter
        } else {
            0.0
        };
        let color = hsl_to_rgb(bucket.hue, bucket.saturation, bucket.lightness + jitter);

        let size = rng.next_unit() * cfg.size_range + size_base;

        points.push(StarPoint {
            position: position.to_array(),
            color,
            size,
        });
    }

    Ok(StarLayer {
        depth_index: layer,
        center: cfg.layer_center(layer),
        radius_band: (r_lo, r_hi),
        points,
    })
}

/// Rotation of a layer about its z axis at `time`; deeper layers turn slower.
#[inline]
pub fn drift_angle(time: f32, depth_index: u32, rate: f32, falloff: f32) -> f32 {
    time * rate * (1.0 - falloff * depth_index as f32)
}

/// Turn a star position about the layer's z axis by `angle`, matching the
/// vertex shader's drift rotation.
#[inline]
pub fn drift_rotate(position: [f32; 3], angle: f32) -> [f32; 3] {
    let (s, c) = angle.sin_cos();
    let [x, y, z] = position;
    [c * x + s * y, -s * x + c * y, z]
}

/// Point-size multiplier in `[1 - 2*depth, 1]` for a star at `position`
/// in a layer turned by `angle`. The phase follows the drifted position.
/// `depth == 0` gives a constant 1.
#[inline]
pub fn twinkle(time: f32, position: [f32; 3], angle: f32, depth: f32) -> f32 {
    if depth <= 0.0 {
        return 1.0;
    }
    let [x, y, _] = drift_rotate(position, angle);
    let phase = STAR_TWINKLE_RATE * time + STAR_TWINKLE_SPATIAL * (x + y);
    phase.sin() * depth + (1.0 - depth)
}
