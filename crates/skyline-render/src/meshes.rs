use skyline_core::geometry::Mesh;
use wgpu::util::DeviceExt;

use super::helpers;
use super::uniforms::{MeshVertex, ObjectUniforms};

/// Interleave a core mesh into GPU vertices. Missing normals default to +z,
/// missing uvs to the origin.
pub(crate) fn interleave(mesh: &Mesh) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| MeshVertex {
            position: *p,
            normal: mesh.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
            uv: mesh.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect()
}

pub(crate) struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub(crate) fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertices = interleave(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

/// A mesh plus its per-object uniforms.
pub(crate) struct SceneObject {
    mesh: GpuMesh,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SceneObject {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        mesh: &Mesh,
        initial: &ObjectUniforms,
    ) -> Self {
        let uniforms = helpers::uniform_buffer(device, label, initial);
        let bind_group = helpers::uniform_bind_group(device, label, layout, &uniforms);
        Self {
            mesh: GpuMesh::upload(device, label, mesh),
            uniforms,
            bind_group,
        }
    }

    pub(crate) fn write(&self, queue: &wgpu::Queue, value: &ObjectUniforms) {
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(value));
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
    }

    pub(crate) fn destroy(&self) {
        self.mesh.destroy();
        self.uniforms.destroy();
    }
}
