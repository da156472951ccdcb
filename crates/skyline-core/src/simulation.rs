//! The owned per-mount simulation: scroll target, smoothed camera, clock.
//!
//! Input handlers and the frame loop both hold a [`Shared`] handle to the
//! same [`HeroSimulation`]. Everything runs on one thread; the last scroll
//! event before a tick wins.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};
use smallvec::SmallVec;

use crate::camera::{Camera, CameraPose, Viewport};
use crate::config::{BloomConfig, SceneConfig};
use crate::constants::{MOON_SUN_OFFSET, NEBULA_TIME_SCALE};
use crate::scene::{atmosphere_pulse, glow_state, moon_rotation, mountain_sway};
use crate::scroll::{ScrollFrame, ScrollInput, ScrollMapper};
use crate::smoother::CameraSmoother;

pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct FrameState {
    pub time: f32,
    pub viewport: Viewport,
    pub pose: CameraPose,
    pub eye: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub star_time: f32,
    pub nebula_time: f32,
    pub nebula_z: f32,
    pub moon_position: Vec3,
    /// Euler angles, applied x then y then z.
    pub moon_rotation: Vec3,
    pub sun_position: Vec3,
    pub glow_position: Vec3,
    pub glow_opacity: f32,
    pub atmosphere_pulse: f32,
    /// Translation per mountain layer, back-to-front.
    pub mountain_offsets: SmallVec<[Vec3; 8]>,
    pub bloom: BloomConfig,
}

impl FrameState {
    /// Moon model matrix from the frame's position and rotation.
    pub fn moon_model(&self) -> Mat4 {
        let r = self.moon_rotation;
        Mat4::from_translation(self.moon_position)
            * Mat4::from_euler(glam::EulerRot::XYZ, r.x, r.y, r.z)
    }
}

#[derive(Debug)]
pub struct HeroSimulation {
    mapper: ScrollMapper,
    smoother: CameraSmoother,
    scroll: ScrollFrame,
    viewport: Viewport,
    pointer: Vec2,
    epoch: Option<f64>,
    time: f32,
    ticks: u64,
    moon_anchor: Vec3,
    glow_center: Option<Vec3>,
    mountain_ranks: SmallVec<[u32; 8]>,
    mountain_base_y: f32,
    bloom: BloomConfig,
}

impl HeroSimulation {
    /// `current` starts on the first waypoint and the mapper has already run
    /// once for scroll position 0.
    pub fn new(cfg: &SceneConfig, viewport: Viewport) -> Self {
        let mapper = ScrollMapper::new(cfg);
        let first = cfg
            .waypoints
            .first()
            .map(|w| w.pose)
            .unwrap_or_default();
        let smoother = CameraSmoother::new(first, cfg.camera.smoothing)
            .with_pointer(cfg.camera.pointer_reactive, cfg.camera.pointer_gain);
        let scroll = mapper.map(&ScrollInput::default());
        let n = cfg.mountains.layers.len();

        Self {
            mapper,
            smoother,
            scroll,
            viewport,
            pointer: Vec2::ZERO,
            epoch: None,
            time: 0.0,
            ticks: 0,
            moon_anchor: cfg.moon.position,
            glow_center: cfg.glow.as_ref().map(|g| g.center),
            mountain_ranks: (0..n).map(|i| (n - 1 - i) as u32).collect(),
            mountain_base_y: cfg.mountains.base_y,
            bloom: cfg.bloom.clone(),
        }
    }

    pub fn on_scroll(&mut self, input: ScrollInput) -> &ScrollFrame {
        self.scroll = self.mapper.map(&input);
        &self.scroll
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            log::debug!("[scene] resize {}x{}", viewport.width, viewport.height);
        }
        self.viewport = viewport;
    }

    /// Pointer in normalised device range, `y` up.
    pub fn on_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer.clamp(Vec2::splat(-1.0), Vec2::ONE);
    }

    pub fn scroll(&self) -> &ScrollFrame {
        &self.scroll
    }

    pub fn target(&self) -> CameraPose {
        self.scroll.target
    }

    pub fn current(&self) -> CameraPose {
        self.smoother.current()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance to wall-clock `now_sec`. The first tick sets the epoch; time
    /// never runs backwards even if the clock does.
    pub fn tick(&mut self, now_sec: f64) -> FrameState {
        let epoch = *self.epoch.get_or_insert(now_sec);
        let elapsed = ((now_sec - epoch).max(0.0)) as f32;
        let dt = (elapsed - self.time).max(0.0);
        self.time = self.time.max(elapsed);
        self.ticks += 1;

        let t = self.time;
        let target = self.scroll.target;
        self.smoother.update(&target, dt);
        let pose = self.smoother.compose(t, self.pointer);

        let camera = Camera::from_pose(&pose, self.viewport);
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        let moon_position = self.moon_anchor + Vec3::new(self.scroll.moon_offset_x, 0.0, 0.0);
        let (glow_position, glow_opacity) = match self.glow_center {
            Some(c) => glow_state(t, c),
            None => (Vec3::ZERO, 0.0),
        };

        let mountain_offsets = self
            .mountain_ranks
            .iter()
            .zip(self.scroll.mountain_depths.iter())
            .map(|(&rank, &z)| {
                let sway = mountain_sway(t, rank);
                Vec3::new(sway.x, self.mountain_base_y + sway.y, z)
            })
            .collect();

        FrameState {
            time: t,
            viewport: self.viewport,
            pose,
            eye: camera.eye,
            view,
            projection,
            view_projection: projection * view,
            star_time: t,
            nebula_time: t * NEBULA_TIME_SCALE,
            nebula_z: self.scroll.nebula_z,
            moon_position,
            moon_rotation: moon_rotation(t, self.scroll.moon_roll),
            sun_position: moon_position + MOON_SUN_OFFSET,
            glow_position,
            glow_opacity,
            atmosphere_pulse: atmosphere_pulse(t),
            mountain_offsets,
            bloom: self.bloom.clone(),
        }
    }
}
