use glam::Mat4;
use skyline_core::geometry::StarLayer;
use skyline_core::StarMotion;
use wgpu::util::DeviceExt;

use super::helpers;
use super::uniforms::{ObjectUniforms, StarInstance};

/// One star layer as instanced quads. The quad corners come from the vertex
/// index, so only the per-star instance buffer is uploaded.
pub(crate) struct StarBatch {
    instances: wgpu::Buffer,
    count: u32,
    depth_index: u32,
    model: Mat4,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl StarBatch {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        layer: &StarLayer,
    ) -> Self {
        let data: Vec<StarInstance> = layer
            .points
            .iter()
            .map(|p| StarInstance {
                pos_size: [p.position[0], p.position[1], p.position[2], p.size],
                color: [p.color[0], p.color[1], p.color[2], 1.0],
            })
            .collect();
        let label = format!("stars_{}", layer.depth_index);
        let instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&label),
            contents: bytemuck::cast_slice(&data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let model = Mat4::from_translation(layer.center);
        let uniforms =
            helpers::uniform_buffer(device, &label, &ObjectUniforms::new(model, [1.0; 3], 1.0));
        let bind_group = helpers::uniform_bind_group(device, &label, layout, &uniforms);
        Self {
            instances,
            count: data.len() as u32,
            depth_index: layer.depth_index,
            model,
            uniforms,
            bind_group,
        }
    }

    /// params: x = drift angle, y = twinkle depth.
    pub(crate) fn write(&self, queue: &wgpu::Queue, motion: &StarMotion, time: f32) {
        let u = ObjectUniforms::new(self.model, [1.0; 3], 1.0).with_params([
            motion.angle(time, self.depth_index),
            motion.twinkle_depth,
            0.0,
            0.0,
        ]);
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&u));
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instances.slice(..));
        pass.draw(0..6, 0..self.count);
    }

    pub(crate) fn destroy(&self) {
        self.instances.destroy();
        self.uniforms.destroy();
    }
}
