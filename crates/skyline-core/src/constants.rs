use glam::Vec3;

// Camera projection
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 2500.0;
pub const CAMERA_LOOK_AT: Vec3 = Vec3::new(0.0, 10.0, -600.0);

// Idle float applied on top of the smoothed pose
pub const FLOAT_AMPLITUDE_X: f32 = 3.0;
pub const FLOAT_AMPLITUDE_Y: f32 = 2.0;
pub const FLOAT_RATE_X: f32 = 0.08;
pub const FLOAT_RATE_Y: f32 = 0.12;

// Smoothing defaults (per callback, frame-rate dependent)
pub const HERO_SMOOTHING_FACTOR: f32 = 0.04;
pub const COMPACT_SMOOTHING_FACTOR: f32 = 0.05;

// Scroll-driven parallax
pub const MOUNTAIN_SCROLL_SCALE: f32 = 0.4;
pub const NEBULA_BEHIND_MOUNTAINS: f32 = 80.0;
pub const MOON_SCROLL_SWAY: f32 = 10.0;
pub const MOON_SCROLL_ROLL: f32 = 0.1; // fraction of PI over the full page

// Idle sway of the mountain silhouettes
pub const MOUNTAIN_SWAY_X: f32 = 3.0;
pub const MOUNTAIN_SWAY_Y: f32 = 1.5;
pub const MOUNTAIN_SWAY_SPREAD: f32 = 0.4; // extra sway per rank from the front

// Mountain silhouette shape
pub const MOUNTAIN_SEGMENTS: u32 = 100;
pub const MOUNTAIN_SPAN: f32 = 1400.0;
pub const MOUNTAIN_RIDGE_BIAS: f32 = -120.0;
pub const MOUNTAIN_BASELINE_Y: f32 = -400.0;
pub const MOUNTAIN_BASELINE_EXTENT: f32 = 6000.0;
pub const MOUNTAIN_BASE_Y: f32 = 50.0;
pub const MOUNTAIN_RANDOM_FRACTION: f32 = 0.18;

// Star shader parity
pub const STAR_DRIFT_RATE: f32 = 0.02;
pub const STAR_DEPTH_FALLOFF: f32 = 0.2;
pub const STAR_TWINKLE_RATE: f32 = 3.0;
pub const STAR_TWINKLE_SPATIAL: f32 = 0.1;
pub const STAR_TWINKLE_DEPTH: f32 = 0.3;
pub const STAR_SIZE_ATTENUATION: f32 = 300.0;

// Nebula shader parity
pub const NEBULA_TIME_SCALE: f32 = 0.4;

// Moon motion
pub const MOON_SPIN_RATE: f32 = 0.08;
pub const MOON_WOBBLE_X: f32 = 0.08;
pub const MOON_WOBBLE_Z: f32 = 0.05;
pub const MOON_SUN_OFFSET: Vec3 = Vec3::new(100.0, 80.0, 150.0);

// Glow / atmosphere
pub const GLOW_ORBIT: Vec3 = Vec3::new(100.0, 30.0, 50.0);
pub const GLOW_BASE_OPACITY: f32 = 0.3;
pub const GLOW_OPACITY_SWING: f32 = 0.1;
pub const ATMOSPHERE_PULSE_RATE: f32 = 1.5;
pub const ATMOSPHERE_PULSE_DEPTH: f32 = 0.08;

// Mobile star budget
pub const MOBILE_BREAKPOINT_PX: u32 = 768;
pub const MOBILE_STARS_PER_LAYER: u32 = 12_000;
