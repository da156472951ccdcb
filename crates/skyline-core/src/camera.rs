//! Camera pose and projection types shared by the simulation and renderers.
//!
//! These types avoid referencing platform-specific APIs so the web and native
//! front-ends can build the same matrices from the same pose.

use glam::{Mat4, Vec2, Vec3};

use crate::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_LOOK_AT, CAMERA_NEAR};

/// Camera position plus an extra local pitch (`rotation.x`) and yaw
/// (`rotation.y`) applied on top of the fixed look-at.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Vec2,
}

impl CameraPose {
    pub const fn new(x: f32, y: f32, z: f32, rot_x: f32, rot_y: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            rotation: Vec2::new(rot_x, rot_y),
        }
    }

    /// Component-wise linear blend, `t = 0` is `self`.
    #[inline]
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.lerp(other.rotation, t),
        }
    }

    /// Largest absolute component difference, used for convergence checks.
    pub fn max_abs_diff(&self, other: &CameraPose) -> f32 {
        let dp = (self.position - other.position).abs().max_element();
        let dr = (self.rotation - other.rotation).abs().max_element();
        dp.max(dr)
    }
}

/// Drawing surface size in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; a degenerate surface falls back to 1.0.
    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Map a pointer position inside a `width` × `height` area (origin top-left)
/// to [-1, 1]² with +y up. A zero-sized area yields the centre.
#[inline]
pub fn normalize_pointer(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if !(width > 0.0 && height > 0.0) {
        return Vec2::ZERO;
    }
    let nx = x / width * 2.0 - 1.0;
    let ny = 1.0 - y / height * 2.0;
    Vec2::new(nx, ny).clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

/// Simple right-handed perspective camera built from a composed pose.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub local_rotation: Vec2,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn from_pose(pose: &CameraPose, viewport: Viewport) -> Self {
        Self {
            eye: pose.position,
            target: CAMERA_LOOK_AT,
            up: Vec3::Y,
            local_rotation: pose.rotation,
            aspect: viewport.aspect(),
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// World to view: look-at, then the pose's local pitch and yaw.
    pub fn view_matrix(&self) -> Mat4 {
        let look = Mat4::look_at_rh(self.eye, self.target, self.up);
        Mat4::from_rotation_x(-self.local_rotation.x)
            * Mat4::from_rotation_y(-self.local_rotation.y)
            * look
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
