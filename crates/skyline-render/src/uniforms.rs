use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use skyline_core::{FrameState, Lights};

/// Per-frame values shared by every scene pipeline (group 0).
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct Globals {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) view: [[f32; 4]; 4],
    pub(crate) proj: [[f32; 4]; 4],
    pub(crate) camera_pos: [f32; 4], // w = time
    pub(crate) viewport: [f32; 4],   // xy = size px, z = nebula time, w = atmosphere pulse
    pub(crate) sun_pos: [f32; 4],    // w = sun intensity
    pub(crate) ambient: [f32; 4],
    pub(crate) back_dir: [f32; 4],
    pub(crate) back_color: [f32; 4],
}

impl Globals {
    pub(crate) fn from_frame(frame: &FrameState, lights: &Lights) -> Self {
        let v = frame.viewport;
        Self {
            view_proj: frame.view_projection.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            proj: frame.projection.to_cols_array_2d(),
            camera_pos: frame.eye.extend(frame.star_time).to_array(),
            viewport: [
                v.width.max(1) as f32,
                v.height.max(1) as f32,
                frame.nebula_time,
                frame.atmosphere_pulse,
            ],
            sun_pos: frame.sun_position.extend(lights.sun_color[0]).to_array(),
            ambient: [lights.ambient[0], lights.ambient[1], lights.ambient[2], 1.0],
            back_dir: lights.back_direction.extend(0.0).to_array(),
            back_color: [
                lights.back_color[0],
                lights.back_color[1],
                lights.back_color[2],
                1.0,
            ],
        }
    }
}

/// Per-object values (group 1).
///
/// `params` depends on the pipeline: stars use `(drift angle, twinkle depth)`,
/// the moon uses `x` as its shimmer amount, the rest ignore it.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct ObjectUniforms {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) color: [f32; 4],
    pub(crate) params: [f32; 4],
    pub(crate) palette: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub(crate) fn new(model: Mat4, color: [f32; 3], opacity: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], opacity],
            params: [0.0; 4],
            palette: [[0.0; 4]; 4],
        }
    }

    pub(crate) fn with_params(mut self, params: [f32; 4]) -> Self {
        self.params = params;
        self
    }

    pub(crate) fn with_palette(mut self, colors: &[[f32; 3]; 4]) -> Self {
        for (dst, c) in self.palette.iter_mut().zip(colors) {
            *dst = [c[0], c[1], c[2], 1.0];
        }
        self
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct PostUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) blur_dir: [f32; 2],
    pub(crate) bloom_strength: f32,
    pub(crate) bloom_radius: f32,
    pub(crate) threshold: f32,
    pub(crate) exposure: f32,
}

/// Interleaved mesh vertex.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct MeshVertex {
    pub(crate) position: [f32; 3],
    pub(crate) normal: [f32; 3],
    pub(crate) uv: [f32; 2],
}

impl MeshVertex {
    pub(crate) const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// One star, drawn as an instanced camera-facing quad.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct StarInstance {
    pub(crate) pos_size: [f32; 4],
    pub(crate) color: [f32; 4],
}

impl StarInstance {
    pub(crate) const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}
