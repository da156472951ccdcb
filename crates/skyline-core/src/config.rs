//! Scene configuration.
//!
//! One parameter set covers both hero variants: [`SceneConfig::hero`] is the
//! full-page background and [`SceneConfig::compact`] the lighter section
//! header. Everything here is fixed at design time; nothing is loaded at
//! runtime.

use glam::Vec3;

use crate::camera::CameraPose;
use crate::color::hex_rgb;
use crate::constants::*;
use crate::error::{ensure_count, ensure_positive, SceneError};
use crate::smoother::Smoothing;

/// Categorical colour choice for stars. Buckets are checked in order; a
/// sample below `cumulative` picks the bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct StarBucket {
    pub cumulative: f32,
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    /// Extra random lightness added on top of `lightness`.
    pub lightness_jitter: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StarFieldConfig {
    pub layers: u32,
    pub stars_per_layer: u32,
    pub radius_min: f32,
    pub radius_range: f32,
    /// Added to `radius_min` for each deeper layer.
    pub layer_radius_step: f32,
    /// Centre of layer 0; deeper layers move by `layer_z_step` along z.
    pub origin: Vec3,
    pub layer_z_step: f32,
    pub size_min: f32,
    pub size_range: f32,
    pub layer_size_step: f32,
    pub buckets: Vec<StarBucket>,
    pub drift_rate: f32,
    pub depth_falloff: f32,
    /// 0 disables twinkle.
    pub twinkle_depth: f32,
}

impl StarFieldConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_count("stars.layers", self.layers)?;
        ensure_count("stars.stars_per_layer", self.stars_per_layer)?;
        ensure_positive("stars.radius_min", self.radius_min)?;
        if !(self.radius_range >= 0.0) || !(self.layer_radius_step >= 0.0) {
            return Err(SceneError::invalid(
                "stars.radius_range",
                "radius range and layer step must be >= 0",
            ));
        }
        ensure_positive("stars.size_min", self.size_min)?;
        if self.buckets.is_empty() {
            return Err(SceneError::invalid("stars.buckets", "needs at least one colour bucket"));
        }
        let mut prev = 0.0;
        for b in &self.buckets {
            if b.cumulative <= prev {
                return Err(SceneError::invalid(
                    "stars.buckets",
                    "cumulative weights must be strictly increasing",
                ));
            }
            prev = b.cumulative;
        }
        if (prev - 1.0).abs() > 1e-4 {
            return Err(SceneError::invalid("stars.buckets", "last cumulative weight must be 1.0"));
        }
        Ok(())
    }

    /// Inclusive radius band of a layer.
    pub fn radius_band(&self, layer: u32) -> (f32, f32) {
        let lo = self.radius_min + self.layer_radius_step * layer as f32;
        (lo, lo + self.radius_range)
    }

    pub fn layer_center(&self, layer: u32) -> Vec3 {
        self.origin + Vec3::new(0.0, 0.0, self.layer_z_step * layer as f32)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NebulaConfig {
    pub width: f32,
    pub height: f32,
    pub segments: u32,
    pub z: f32,
    pub colors: [[f32; 3]; 4],
    pub opacity: f32,
    /// Track the farthest mountain layer on scroll instead of staying at `z`.
    pub follow_mountains: bool,
}

impl NebulaConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_positive("nebula.width", self.width)?;
        ensure_positive("nebula.height", self.height)?;
        ensure_count("nebula.segments", self.segments)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoonConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    /// Displacement scale as a fraction of the radius.
    pub crater_depth: f32,
    pub position: Vec3,
}

impl MoonConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_positive("moon.radius", self.radius)?;
        if self.width_segments < 3 || self.height_segments < 2 {
            return Err(SceneError::invalid(
                "moon.segments",
                format!(
                    "need at least 3x2 segments, got {}x{}",
                    self.width_segments, self.height_segments
                ),
            ));
        }
        if !(0.0..0.5).contains(&self.crater_depth) {
            return Err(SceneError::invalid("moon.crater_depth", "must be in [0, 0.5)"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlowConfig {
    pub radius: f32,
    pub segments: u32,
    pub color: [f32; 3],
    pub center: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereConfig {
    pub radius: f32,
    pub segments: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MountainLayerConfig {
    pub base_depth: f32,
    pub height: f32,
    pub roughness: f32,
    pub phase_offset: f32,
    pub color: [f32; 3],
    pub opacity: f32,
    /// Scroll parallax multiplier.
    pub speed: f32,
}

/// Mountain layers, stored back-to-front.
#[derive(Clone, Debug, PartialEq)]
pub struct MountainConfig {
    pub layers: Vec<MountainLayerConfig>,
    pub segments: u32,
    pub span: f32,
    pub scroll_scale: f32,
    pub base_y: f32,
}

impl MountainConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.layers.is_empty() {
            return Err(SceneError::invalid("mountains.layers", "needs at least one layer"));
        }
        ensure_count("mountains.segments", self.segments)?;
        ensure_positive("mountains.span", self.span)?;
        if !(self.scroll_scale >= 0.0) {
            return Err(SceneError::invalid("mountains.scroll_scale", "must be >= 0"));
        }
        for l in &self.layers {
            ensure_positive("mountains.height", l.height)?;
            ensure_positive("mountains.roughness", l.roughness)?;
            if !(0.0..=1.0).contains(&l.opacity) {
                return Err(SceneError::invalid("mountains.opacity", "must be in [0, 1]"));
            }
            if !(l.speed >= 0.0) {
                return Err(SceneError::invalid("mountains.speed", "must be >= 0"));
            }
        }
        for pair in self.layers.windows(2) {
            if pair[1].base_depth < pair[0].base_depth {
                return Err(SceneError::invalid(
                    "mountains.base_depth",
                    "layers must be ordered back-to-front",
                ));
            }
            if pair[1].speed < pair[0].speed {
                return Err(SceneError::invalid(
                    "mountains.speed",
                    "multipliers must not decrease towards the front",
                ));
            }
        }
        Ok(())
    }
}

/// A named camera keyframe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub name: &'static str,
    pub pose: CameraPose,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub smoothing: Smoothing,
    pub pointer_reactive: bool,
    pub pointer_gain: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BloomConfig {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
    pub exposure: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub stars: StarFieldConfig,
    pub nebula: NebulaConfig,
    pub moon: MoonConfig,
    pub glow: Option<GlowConfig>,
    pub atmosphere: Option<AtmosphereConfig>,
    pub mountains: MountainConfig,
    pub waypoints: Vec<Waypoint>,
    pub camera: CameraConfig,
    pub bloom: BloomConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::hero()
    }
}

impl SceneConfig {
    /// Full-page background: deep star field, moon, five ridges, five waypoints.
    pub fn hero() -> Self {
        Self {
            stars: StarFieldConfig {
                layers: 4,
                stars_per_layer: 15_000,
                radius_min: 400.0,
                radius_range: 1200.0,
                layer_radius_step: 200.0,
                origin: Vec3::new(0.0, -100.0, -500.0),
                layer_z_step: -100.0,
                size_min: 0.5,
                size_range: 3.0,
                layer_size_step: 0.3,
                buckets: vec![
                    StarBucket {
                        cumulative: 0.6,
                        hue: 0.0,
                        saturation: 0.0,
                        lightness: 0.85,
                        lightness_jitter: 0.15,
                    },
                    StarBucket {
                        cumulative: 0.85,
                        hue: 0.54,
                        saturation: 0.7,
                        lightness: 0.75,
                        lightness_jitter: 0.0,
                    },
                    StarBucket {
                        cumulative: 1.0,
                        hue: 0.15,
                        saturation: 0.6,
                        lightness: 0.7,
                        lightness_jitter: 0.0,
                    },
                ],
                drift_rate: STAR_DRIFT_RATE,
                depth_falloff: STAR_DEPTH_FALLOFF,
                twinkle_depth: STAR_TWINKLE_DEPTH,
            },
            nebula: NebulaConfig {
                width: 10_000.0,
                height: 5_000.0,
                segments: 120,
                z: -1200.0,
                colors: [
                    hex_rgb(0x000510),
                    hex_rgb(0x000a15),
                    hex_rgb(0x001428),
                    hex_rgb(0x0a1a2e),
                ],
                opacity: 0.25,
                follow_mountains: true,
            },
            moon: MoonConfig {
                radius: 120.0,
                width_segments: 96,
                height_segments: 64,
                crater_depth: 0.035,
                position: Vec3::new(0.0, 10.0, -400.0),
            },
            glow: Some(GlowConfig {
                radius: 80.0,
                segments: 32,
                color: hex_rgb(0x4488ff),
                center: Vec3::new(0.0, 50.0, -1500.0),
            }),
            atmosphere: Some(AtmosphereConfig {
                radius: 700.0,
                segments: 48,
            }),
            mountains: MountainConfig {
                layers: vec![
                    mountain(-530.0, 190.0, 0.7, 7.0, 0x141435, 0.55, 0.8),
                    mountain(-380.0, 165.0, 0.9, 5.2, 0x12122a, 0.7, 1.4),
                    mountain(-250.0, 140.0, 1.2, 3.5, 0x101020, 0.85, 2.0),
                    mountain(-140.0, 115.0, 1.5, 1.8, 0x0d0d1a, 0.95, 2.6),
                    mountain(-50.0, 90.0, 1.8, 0.0, 0x0a0a15, 1.0, 3.2),
                ],
                segments: MOUNTAIN_SEGMENTS,
                span: MOUNTAIN_SPAN,
                scroll_scale: MOUNTAIN_SCROLL_SCALE,
                base_y: MOUNTAIN_BASE_Y,
            },
            waypoints: vec![
                waypoint("intro", 0.0, 30.0, 300.0, 0.0, 0.0),
                waypoint("ridge", -40.0, 50.0, 50.0, 0.15, -0.12),
                waypoint("valley", 50.0, 65.0, -300.0, -0.08, 0.18),
                waypoint("summit", -30.0, 75.0, -700.0, 0.12, -0.08),
                waypoint("horizon", 0.0, 85.0, -1100.0, 0.0, 0.0),
            ],
            camera: CameraConfig {
                smoothing: Smoothing::PerTick {
                    factor: HERO_SMOOTHING_FACTOR,
                },
                pointer_reactive: true,
                pointer_gain: 0.02,
            },
            bloom: BloomConfig {
                strength: 1.2,
                radius: 0.6,
                threshold: 0.85,
                exposure: 1.2,
            },
        }
    }

    /// Section-header variant: lighter star field, no glow or atmosphere,
    /// four ridges and a two-keyframe dolly.
    pub fn compact() -> Self {
        let hero = Self::hero();
        Self {
            stars: StarFieldConfig {
                layers: 3,
                stars_per_layer: 5_000,
                radius_min: 200.0,
                radius_range: 800.0,
                layer_radius_step: 0.0,
                origin: Vec3::ZERO,
                layer_z_step: 0.0,
                size_min: 0.5,
                size_range: 2.0,
                layer_size_step: 0.0,
                buckets: vec![
                    StarBucket {
                        cumulative: 0.7,
                        hue: 0.0,
                        saturation: 0.0,
                        lightness: 0.8,
                        lightness_jitter: 0.2,
                    },
                    StarBucket {
                        cumulative: 0.9,
                        hue: 0.55,
                        saturation: 0.7,
                        lightness: 0.8,
                        lightness_jitter: 0.0,
                    },
                    StarBucket {
                        cumulative: 1.0,
                        hue: 0.5,
                        saturation: 0.7,
                        lightness: 0.8,
                        lightness_jitter: 0.0,
                    },
                ],
                drift_rate: 0.05,
                depth_falloff: 0.3,
                twinkle_depth: 0.0,
            },
            nebula: NebulaConfig {
                width: 8_000.0,
                height: 4_000.0,
                segments: 100,
                z: -1050.0,
                colors: [
                    hex_rgb(0x38bdf8),
                    hex_rgb(0x3b82f6),
                    hex_rgb(0x3b82f6),
                    hex_rgb(0x38bdf8),
                ],
                opacity: 0.3,
                follow_mountains: false,
            },
            moon: MoonConfig {
                width_segments: 48,
                height_segments: 32,
                ..hero.moon
            },
            glow: None,
            atmosphere: None,
            mountains: MountainConfig {
                layers: vec![
                    mountain(-200.0, 120.0, 1.0, 0.0, 0x0a4668, 0.4, 1.0),
                    mountain(-150.0, 100.0, 1.0, 0.0, 0x0f3460, 0.6, 1.9),
                    mountain(-100.0, 80.0, 1.0, 0.0, 0x16213e, 0.8, 2.8),
                    mountain(-50.0, 60.0, 1.0, 0.0, 0x1a1a2e, 1.0, 3.7),
                ],
                segments: 50,
                span: 1000.0,
                scroll_scale: 0.25,
                base_y: 0.0,
            },
            waypoints: vec![
                waypoint("intro", 0.0, 30.0, 100.0, 0.0, 0.0),
                waypoint("descent", 0.0, 50.0, -50.0, 0.0, 0.0),
            ],
            camera: CameraConfig {
                smoothing: Smoothing::PerTick {
                    factor: COMPACT_SMOOTHING_FACTOR,
                },
                pointer_reactive: false,
                pointer_gain: 0.0,
            },
            bloom: BloomConfig {
                strength: 0.6,
                radius: 0.4,
                threshold: 0.9,
                exposure: 0.5,
            },
        }
    }

    /// Hero preset with the smaller star budget on narrow screens.
    pub fn for_viewport_width(css_width: u32) -> Self {
        let mut cfg = Self::hero();
        if css_width < MOBILE_BREAKPOINT_PX {
            cfg.stars.stars_per_layer = MOBILE_STARS_PER_LAYER;
        }
        cfg
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        self.stars.validate()?;
        self.nebula.validate()?;
        self.moon.validate()?;
        if let Some(g) = &self.glow {
            ensure_positive("glow.radius", g.radius)?;
            ensure_count("glow.segments", g.segments)?;
        }
        if let Some(a) = &self.atmosphere {
            ensure_positive("atmosphere.radius", a.radius)?;
            ensure_count("atmosphere.segments", a.segments)?;
        }
        self.mountains.validate()?;
        if self.waypoints.is_empty() {
            return Err(SceneError::invalid("waypoints", "needs at least one waypoint"));
        }
        self.camera.smoothing.validate()?;
        Ok(())
    }
}

fn mountain(
    base_depth: f32,
    height: f32,
    roughness: f32,
    phase_offset: f32,
    color: u32,
    opacity: f32,
    speed: f32,
) -> MountainLayerConfig {
    MountainLayerConfig {
        base_depth,
        height,
        roughness,
        phase_offset,
        color: hex_rgb(color),
        opacity,
        speed,
    }
}

const fn waypoint(name: &'static str, x: f32, y: f32, z: f32, rx: f32, ry: f32) -> Waypoint {
    Waypoint {
        name,
        pose: CameraPose::new(x, y, z, rx, ry),
    }
}
