use skyline_core::BloomConfig;

use super::helpers;
use super::targets::{RenderTargets, HDR_FORMAT};
use super::uniforms::PostUniforms;

/// Bloom chain: bright pass, separable blur, composite with tone mapping.
///
/// Each blur direction has its own uniform buffer: queued writes all land
/// before the encoder runs, so passes cannot share one.
pub(crate) struct PostResources {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    base_uniforms: wgpu::Buffer,
    blur_h_uniforms: wgpu::Buffer,
    blur_v_uniforms: wgpu::Buffer,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    groups: PostBindGroups,
}

/// Bind groups that reference the render targets; rebuilt on resize.
struct PostBindGroups {
    hdr: wgpu::BindGroup,
    blur_h: wgpu::BindGroup,
    blur_v: wgpu::BindGroup,
    bloom_only: wgpu::BindGroup,
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        post_shader: &wgpu::ShaderModule,
        swap_format: wgpu::TextureFormat,
        targets: &RenderTargets,
    ) -> Self {
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let zero = PostUniforms {
            resolution: [1.0, 1.0],
            blur_dir: [0.0, 0.0],
            bloom_strength: 0.0,
            bloom_radius: 0.0,
            threshold: 1.0,
            exposure: 1.0,
        };
        let base_uniforms = helpers::uniform_buffer(device, "post_uniforms", &zero);
        let blur_h_uniforms = helpers::uniform_buffer(device, "post_uniforms_blur_h", &zero);
        let blur_v_uniforms = helpers::uniform_buffer(device, "post_uniforms_blur_v", &zero);

        let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline = helpers::make_post_pipeline(
            device,
            &pl_bright_blur,
            post_shader,
            "fs_bright",
            HDR_FORMAT,
            None,
        );
        let blur_pipeline = helpers::make_post_pipeline(
            device,
            &pl_bright_blur,
            post_shader,
            "fs_blur",
            HDR_FORMAT,
            None,
        );
        let composite_pipeline = helpers::make_post_pipeline(
            device,
            &pl_composite,
            post_shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );

        let groups = PostBindGroups::new(
            device,
            &bgl0,
            &bgl1,
            &sampler,
            [&base_uniforms, &blur_h_uniforms, &blur_v_uniforms],
            targets,
        );

        Self {
            bgl0,
            bgl1,
            sampler,
            base_uniforms,
            blur_h_uniforms,
            blur_v_uniforms,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            groups,
        }
    }

    pub(crate) fn rebuild_bind_groups(&mut self, device: &wgpu::Device, targets: &RenderTargets) {
        self.groups = PostBindGroups::new(
            device,
            &self.bgl0,
            &self.bgl1,
            &self.sampler,
            [
                &self.base_uniforms,
                &self.blur_h_uniforms,
                &self.blur_v_uniforms,
            ],
            targets,
        );
    }

    pub(crate) fn write_uniforms(
        &self,
        queue: &wgpu::Queue,
        bloom: &BloomConfig,
        bloom_size: (u32, u32),
    ) {
        let base = PostUniforms {
            resolution: [bloom_size.0 as f32, bloom_size.1 as f32],
            blur_dir: [0.0, 0.0],
            bloom_strength: bloom.strength,
            bloom_radius: bloom.radius,
            threshold: bloom.threshold,
            exposure: bloom.exposure,
        };
        let h = PostUniforms {
            blur_dir: [1.0, 0.0],
            ..base
        };
        let v = PostUniforms {
            blur_dir: [0.0, 1.0],
            ..base
        };
        queue.write_buffer(&self.base_uniforms, 0, bytemuck::bytes_of(&base));
        queue.write_buffer(&self.blur_h_uniforms, 0, bytemuck::bytes_of(&h));
        queue.write_buffer(&self.blur_v_uniforms, 0, bytemuck::bytes_of(&v));
    }

    /// hdr -> bloom_a -> bloom_b -> bloom_a, then hdr + bloom_a to `output`.
    pub(crate) fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        output: &wgpu::TextureView,
    ) {
        let g = &self.groups;
        blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            &self.bright_pipeline,
            &g.hdr,
            None,
        );
        blit(
            encoder,
            "blur_h",
            &targets.bloom_b_view,
            &self.blur_pipeline,
            &g.blur_h,
            None,
        );
        blit(
            encoder,
            "blur_v",
            &targets.bloom_a_view,
            &self.blur_pipeline,
            &g.blur_v,
            None,
        );
        blit(
            encoder,
            "composite",
            output,
            &self.composite_pipeline,
            &g.hdr,
            Some(&g.bloom_only),
        );
    }
}

impl PostBindGroups {
    fn new(
        device: &wgpu::Device,
        bgl0: &wgpu::BindGroupLayout,
        bgl1: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        [base, blur_h, blur_v]: [&wgpu::Buffer; 3],
        targets: &RenderTargets,
    ) -> Self {
        let with_uniform = |label: &str, view: &wgpu::TextureView, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let bloom_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        Self {
            hdr: with_uniform("bg_hdr", &targets.hdr_view, base),
            blur_h: with_uniform("bg_from_bloom_a", &targets.bloom_a_view, blur_h),
            blur_v: with_uniform("bg_from_bloom_b", &targets.bloom_b_view, blur_v),
            bloom_only,
        }
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
