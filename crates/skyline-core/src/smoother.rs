use glam::{Vec2, Vec3};

use crate::camera::CameraPose;
use crate::constants::{FLOAT_AMPLITUDE_X, FLOAT_AMPLITUDE_Y, FLOAT_RATE_X, FLOAT_RATE_Y};
use crate::error::SceneError;

/// How the current pose chases the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Smoothing {
    /// Fixed blend per tick regardless of elapsed time. Matches the shipped
    /// page; converges faster on high refresh-rate displays.
    PerTick { factor: f32 },
    /// Frame-rate independent decay, `k = 1 - exp(-dt / tau)`.
    TimeConstant { tau_sec: f32 },
}

impl Smoothing {
    pub fn validate(&self) -> Result<(), SceneError> {
        match *self {
            Smoothing::PerTick { factor } if factor > 0.0 && factor <= 1.0 => Ok(()),
            Smoothing::PerTick { factor } => Err(SceneError::invalid(
                "camera.smoothing.factor",
                format!("must be in (0, 1], got {factor}"),
            )),
            Smoothing::TimeConstant { tau_sec } if tau_sec.is_finite() && tau_sec > 0.0 => Ok(()),
            Smoothing::TimeConstant { tau_sec } => Err(SceneError::invalid(
                "camera.smoothing.tau_sec",
                format!("must be > 0, got {tau_sec}"),
            )),
        }
    }

    /// Blend factor for a tick that covered `dt` seconds.
    #[inline]
    pub fn blend(&self, dt: f32) -> f32 {
        match *self {
            Smoothing::PerTick { factor } => factor,
            Smoothing::TimeConstant { tau_sec } => {
                if dt <= 0.0 {
                    0.0
                } else {
                    1.0 - (-dt / tau_sec).exp()
                }
            }
        }
    }
}

/// Idle float offset added after smoothing.
#[inline]
pub fn idle_float(time: f32) -> Vec2 {
    Vec2::new(
        (time * FLOAT_RATE_X).sin() * FLOAT_AMPLITUDE_X,
        (time * FLOAT_RATE_Y).cos() * FLOAT_AMPLITUDE_Y,
    )
}

/// Owns `current`; only the render tick may advance it.
#[derive(Clone, Debug)]
pub struct CameraSmoother {
    smoothing: Smoothing,
    pointer_gain: f32,
    pointer_reactive: bool,
    current: CameraPose,
}

impl CameraSmoother {
    /// Start at `initial` (the first waypoint) so mounting never snaps.
    pub fn new(initial: CameraPose, smoothing: Smoothing) -> Self {
        Self {
            smoothing,
            pointer_gain: 0.0,
            pointer_reactive: false,
            current: initial,
        }
    }

    pub fn with_pointer(mut self, reactive: bool, gain: f32) -> Self {
        self.pointer_reactive = reactive;
        self.pointer_gain = gain;
        self
    }

    pub fn current(&self) -> CameraPose {
        self.current
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// One smoothing step towards `target`.
    pub fn update(&mut self, target: &CameraPose, dt: f32) -> CameraPose {
        let k = self.smoothing.blend(dt).clamp(0.0, 1.0);
        self.current = self.current.lerp(target, k);
        self.current
    }

    /// Final pose for drawing: smoothed pose plus idle float plus the
    /// bounded pointer offset. Does not feed back into `current`.
    pub fn compose(&self, time: f32, pointer: Vec2) -> CameraPose {
        let float = idle_float(time);
        let mut pose = self.current;
        pose.position += Vec3::new(float.x, float.y, 0.0);
        if self.pointer_reactive {
            let p = pointer.clamp(Vec2::splat(-1.0), Vec2::ONE);
            pose.position += Vec3::new(p.x, p.y, 0.0) * self.pointer_gain;
        }
        pose
    }
}
