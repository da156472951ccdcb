use glam::{Mat4, Vec3};
use skyline_core::{FrameState, Lights, Scene, StarMotion};

use super::helpers::{self, ScenePipelineDesc, ADDITIVE};
use super::meshes::SceneObject;
use super::stars::StarBatch;
use super::targets::HDR_FORMAT;
use super::uniforms::{MeshVertex, ObjectUniforms, StarInstance};

const MOON_ALBEDO: [f32; 3] = [0.78, 0.78, 0.8];
const MOON_SHIMMER: f32 = 0.03;

pub(crate) struct ScenePipelines {
    pub(crate) object_layout: wgpu::BindGroupLayout,
    stars: wgpu::RenderPipeline,
    nebula: wgpu::RenderPipeline,
    moon: wgpu::RenderPipeline,
    glow: wgpu::RenderPipeline,
    atmosphere: wgpu::RenderPipeline,
    mountains: wgpu::RenderPipeline,
}

impl ScenePipelines {
    pub(crate) fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        globals_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let object_layout = helpers::uniform_layout(device, "object_bgl");
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[globals_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let mesh = [MeshVertex::layout()];
        let star = [StarInstance::layout()];
        let make = |desc: ScenePipelineDesc<'_>| {
            helpers::make_scene_pipeline(device, &layout, shader, HDR_FORMAT, &desc)
        };

        let stars = make(ScenePipelineDesc {
            label: "stars_pipeline",
            vs_entry: "vs_star",
            fs_entry: "fs_star",
            buffers: &star,
            cull_mode: None,
            blend: ADDITIVE,
        });
        let nebula = make(ScenePipelineDesc {
            label: "nebula_pipeline",
            vs_entry: "vs_nebula",
            fs_entry: "fs_nebula",
            buffers: &mesh,
            cull_mode: None,
            blend: ADDITIVE,
        });
        let moon = make(ScenePipelineDesc {
            label: "moon_pipeline",
            vs_entry: "vs_mesh",
            fs_entry: "fs_moon",
            buffers: &mesh,
            cull_mode: Some(wgpu::Face::Back),
            blend: wgpu::BlendState::REPLACE,
        });
        let glow = make(ScenePipelineDesc {
            label: "glow_pipeline",
            vs_entry: "vs_mesh",
            fs_entry: "fs_glow",
            buffers: &mesh,
            cull_mode: Some(wgpu::Face::Back),
            blend: ADDITIVE,
        });
        // Inside faces only: the camera sits within the shell.
        let atmosphere = make(ScenePipelineDesc {
            label: "atmosphere_pipeline",
            vs_entry: "vs_mesh",
            fs_entry: "fs_atmosphere",
            buffers: &mesh,
            cull_mode: Some(wgpu::Face::Front),
            blend: ADDITIVE,
        });
        let mountains = make(ScenePipelineDesc {
            label: "mountains_pipeline",
            vs_entry: "vs_mesh",
            fs_entry: "fs_flat",
            buffers: &mesh,
            cull_mode: None,
            blend: wgpu::BlendState::ALPHA_BLENDING,
        });

        Self {
            object_layout,
            stars,
            nebula,
            moon,
            glow,
            atmosphere,
            mountains,
        }
    }
}

struct Tinted {
    object: SceneObject,
    color: [f32; 3],
    opacity: f32,
}

/// GPU copies of one mounted [`Scene`].
pub(crate) struct SceneResources {
    pub(crate) lights: Lights,
    star_motion: StarMotion,
    stars: Vec<StarBatch>,
    nebula: SceneObject,
    nebula_colors: [[f32; 3]; 4],
    nebula_opacity: f32,
    moon: SceneObject,
    glow: Option<Tinted>,
    atmosphere: Option<SceneObject>,
    mountains: Vec<Tinted>,
}

impl SceneResources {
    pub(crate) fn upload(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        scene: &Scene,
    ) -> Self {
        let identity = ObjectUniforms::new(Mat4::IDENTITY, [1.0; 3], 1.0);
        let stars = scene
            .stars
            .iter()
            .map(|layer| StarBatch::new(device, layout, layer))
            .collect();
        let nebula = SceneObject::new(device, layout, "nebula", &scene.nebula.mesh, &identity);
        let moon = SceneObject::new(device, layout, "moon", &scene.moon.mesh, &identity);
        let glow = scene.glow.as_ref().map(|g| Tinted {
            object: SceneObject::new(device, layout, "glow", &g.mesh, &identity),
            color: g.color,
            opacity: 1.0,
        });
        let atmosphere = scene
            .atmosphere
            .as_ref()
            .map(|a| SceneObject::new(device, layout, "atmosphere", &a.mesh, &identity));
        let mountains = scene
            .mountains
            .iter()
            .map(|m| Tinted {
                object: SceneObject::new(
                    device,
                    layout,
                    &format!("mountain_{}", m.index),
                    &m.mesh,
                    &identity,
                ),
                color: m.color,
                opacity: m.opacity,
            })
            .collect();

        Self {
            lights: scene.lights.clone(),
            star_motion: scene.star_motion,
            stars,
            nebula,
            nebula_colors: scene.nebula.colors,
            nebula_opacity: scene.nebula.opacity,
            moon,
            glow,
            atmosphere,
            mountains,
        }
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, frame: &FrameState) {
        for batch in &self.stars {
            batch.write(queue, &self.star_motion, frame.star_time);
        }
        self.nebula.write(
            queue,
            &ObjectUniforms::new(
                Mat4::from_translation(Vec3::new(0.0, 0.0, frame.nebula_z)),
                [1.0; 3],
                self.nebula_opacity,
            )
            .with_palette(&self.nebula_colors),
        );
        self.moon.write(
            queue,
            &ObjectUniforms::new(frame.moon_model(), MOON_ALBEDO, 1.0)
                .with_params([MOON_SHIMMER, 0.0, 0.0, 0.0]),
        );
        if let Some(glow) = &self.glow {
            glow.object.write(
                queue,
                &ObjectUniforms::new(
                    Mat4::from_translation(frame.glow_position),
                    glow.color,
                    frame.glow_opacity,
                ),
            );
        }
        if let Some(atmosphere) = &self.atmosphere {
            atmosphere.write(queue, &ObjectUniforms::new(Mat4::IDENTITY, [1.0; 3], 1.0));
        }
        for (m, offset) in self.mountains.iter().zip(frame.mountain_offsets.iter()) {
            m.object.write(
                queue,
                &ObjectUniforms::new(Mat4::from_translation(*offset), m.color, m.opacity),
            );
        }
    }

    /// Painter's order: nebula, glow, stars, atmosphere, moon, mountains
    /// back-to-front.
    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipelines: &ScenePipelines) {
        pass.set_pipeline(&pipelines.nebula);
        self.nebula.draw(pass);

        if let Some(glow) = &self.glow {
            pass.set_pipeline(&pipelines.glow);
            glow.object.draw(pass);
        }

        pass.set_pipeline(&pipelines.stars);
        for batch in &self.stars {
            batch.draw(pass);
        }

        if let Some(atmosphere) = &self.atmosphere {
            pass.set_pipeline(&pipelines.atmosphere);
            atmosphere.draw(pass);
        }

        pass.set_pipeline(&pipelines.moon);
        self.moon.draw(pass);

        pass.set_pipeline(&pipelines.mountains);
        for m in &self.mountains {
            m.object.draw(pass);
        }
    }

    pub(crate) fn destroy(&self) {
        for batch in &self.stars {
            batch.destroy();
        }
        self.nebula.destroy();
        self.moon.destroy();
        if let Some(glow) = &self.glow {
            glow.object.destroy();
        }
        if let Some(atmosphere) = &self.atmosphere {
            atmosphere.destroy();
        }
        for m in &self.mountains {
            m.object.destroy();
        }
    }
}
