//! Scene assembly and the per-frame animation curves of its objects.

use glam::{Vec2, Vec3};

use crate::color::hex_rgb;
use crate::config::SceneConfig;
use crate::constants::*;
use crate::error::SceneError;
use crate::geometry::{
    drift_angle, generate_moon, generate_mountain_layer, generate_nebula, generate_star_layer,
    uv_sphere, Mesh, MountainLayer, StarLayer,
};
use crate::random::RandomSource;

#[derive(Clone, Debug, PartialEq)]
pub struct Nebula {
    pub mesh: Mesh,
    pub z: f32,
    pub colors: [[f32; 3]; 4],
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Moon {
    pub mesh: Mesh,
    pub position: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Glow {
    pub mesh: Mesh,
    pub color: [f32; 3],
    pub center: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Atmosphere {
    pub mesh: Mesh,
}

/// Fixed lights. Colours are premultiplied by intensity.
#[derive(Clone, Debug, PartialEq)]
pub struct Lights {
    pub ambient: [f32; 3],
    pub back_direction: Vec3,
    pub back_color: [f32; 3],
    pub sun_color: [f32; 3],
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: scale(hex_rgb(0x0a1a2e), 1.2),
            // Directional lights shine from their position towards the origin.
            back_direction: (-Vec3::new(-100.0, 100.0, -500.0)).normalize(),
            back_color: scale(hex_rgb(0x2244aa), 0.8),
            sun_color: [4.0, 4.0, 4.0],
        }
    }
}

/// Shader-side star animation parameters, shared by every layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarMotion {
    pub drift_rate: f32,
    pub depth_falloff: f32,
    pub twinkle_depth: f32,
}

impl StarMotion {
    /// Layer rotation at `time`, see [`drift_angle`].
    pub fn angle(&self, time: f32, depth_index: u32) -> f32 {
        drift_angle(time, depth_index, self.drift_rate, self.depth_falloff)
    }
}

fn scale(c: [f32; 3], k: f32) -> [f32; 3] {
    [c[0] * k, c[1] * k, c[2] * k]
}

/// All generated geometry. Built once per mount and never rebuilt.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub stars: Vec<StarLayer>,
    pub star_motion: StarMotion,
    pub nebula: Nebula,
    pub moon: Moon,
    pub glow: Option<Glow>,
    pub atmosphere: Option<Atmosphere>,
    /// Back-to-front.
    pub mountains: Vec<MountainLayer>,
    pub lights: Lights,
}

impl Scene {
    pub fn build(cfg: &SceneConfig, rng: &mut dyn RandomSource) -> Result<Self, SceneError> {
        cfg.validate()?;

        let stars = (0..cfg.stars.layers)
            .map(|l| generate_star_layer(&cfg.stars, l, rng))
            .collect::<Result<Vec<_>, _>>()?;

        let nebula = Nebula {
            mesh: generate_nebula(&cfg.nebula)?,
            z: cfg.nebula.z,
            colors: cfg.nebula.colors,
            opacity: cfg.nebula.opacity,
        };

        let moon = Moon {
            mesh: generate_moon(&cfg.moon)?,
            position: cfg.moon.position,
        };

        let glow = match &cfg.glow {
            Some(g) => Some(Glow {
                mesh: uv_sphere(g.radius, g.segments, g.segments)?,
                color: g.color,
                center: g.center,
            }),
            None => None,
        };

        let atmosphere = match &cfg.atmosphere {
            Some(a) => Some(Atmosphere {
                mesh: uv_sphere(a.radius, a.segments, a.segments)?,
            }),
            None => None,
        };

        let mountains = (0..cfg.mountains.layers.len())
            .map(|i| generate_mountain_layer(&cfg.mountains, i, rng))
            .collect::<Result<Vec<_>, _>>()?;

        let scene = Scene {
            stars,
            star_motion: StarMotion {
                drift_rate: cfg.stars.drift_rate,
                depth_falloff: cfg.stars.depth_falloff,
                twinkle_depth: cfg.stars.twinkle_depth,
            },
            nebula,
            moon,
            glow,
            atmosphere,
            mountains,
            lights: Lights::default(),
        };
        log::info!(
            "[scene] built: {} stars in {} layers, moon {} verts, {} mountain layers",
            scene.star_count(),
            scene.stars.len(),
            scene.moon.mesh.vertex_count(),
            scene.mountains.len()
        );
        Ok(scene)
    }

    pub fn star_count(&self) -> usize {
        self.stars.iter().map(StarLayer::len).sum()
    }
}

/// Moon Euler rotation (x, y, z) at `time`, with the scroll roll added to z.
pub fn moon_rotation(time: f32, scroll_roll: f32) -> Vec3 {
    Vec3::new(
        (time * 0.05).sin() * MOON_WOBBLE_X,
        time * MOON_SPIN_RATE,
        (time * 0.04).cos() * MOON_WOBBLE_Z + scroll_roll,
    )
}

/// Glow position and opacity at `time`.
pub fn glow_state(time: f32, center: Vec3) -> (Vec3, f32) {
    let offset = Vec3::new(
        (time * 0.5).sin() * GLOW_ORBIT.x,
        (time * 0.3).cos() * GLOW_ORBIT.y,
        (time * 0.2).sin() * GLOW_ORBIT.z,
    );
    let opacity = GLOW_BASE_OPACITY + (time * 2.0).sin() * GLOW_OPACITY_SWING;
    (center + offset, opacity)
}

pub fn atmosphere_pulse(time: f32) -> f32 {
    (time * ATMOSPHERE_PULSE_RATE).sin() * ATMOSPHERE_PULSE_DEPTH + (1.0 - ATMOSPHERE_PULSE_DEPTH)
}

/// Idle sway of a mountain layer; `rank` 0 is the front layer and sways least.
pub fn mountain_sway(time: f32, rank: u32) -> Vec2 {
    let spread = 1.0 + rank as f32 * MOUNTAIN_SWAY_SPREAD;
    Vec2::new(
        (time * 0.08).sin() * MOUNTAIN_SWAY_X * spread,
        (time * 0.1).cos() * MOUNTAIN_SWAY_Y * spread,
    )
}
