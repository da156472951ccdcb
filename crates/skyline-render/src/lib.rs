//! wgpu renderer for the hero background: scene passes into an HDR target,
//! then bloom and tone mapping onto the surface.
//!
//! Shared by the web and native front-ends; the surface target is whatever
//! the host hands in (a canvas or a window).

mod helpers;
mod meshes;
mod post;
mod scene;
mod stars;
mod targets;
mod uniforms;

use skyline_core::{FrameSink, FrameState, Scene, SceneError, Viewport};

use post::PostResources;
use scene::{ScenePipelines, SceneResources};
use targets::RenderTargets;
use uniforms::Globals;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.004,
    a: 1.0,
};

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,
    post: PostResources,
    pipelines: ScenePipelines,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    scene: Option<SceneResources>,
    released: bool,
}

/// Create a renderer, mapping any failure to [`SceneError::ContextUnavailable`]
/// so the lifecycle can degrade instead of erroring out.
pub async fn create_renderer(
    target: impl Into<wgpu::SurfaceTarget<'static>>,
    width: u32,
    height: u32,
) -> Result<GpuState, SceneError> {
    GpuState::new(target, width, height)
        .await
        .map_err(|e| SceneError::ContextUnavailable(format!("{e:#}")))
}

impl GpuState {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {e:?}"))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = RenderTargets::new(&device, width, height);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(POST_WGSL.into()),
        });

        let globals_layout = helpers::uniform_layout(&device, "globals_bgl");
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group =
            helpers::uniform_bind_group(&device, "globals_bg", &globals_layout, &globals_buffer);
        let pipelines = ScenePipelines::new(&device, &scene_shader, &globals_layout);
        let post = PostResources::new(&device, &post_shader, format, &targets);

        log::info!("[render] surface {width}x{height} {format:?}");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            post,
            pipelines,
            globals_buffer,
            globals_bind_group,
            scene: None,
            released: false,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FrameSink for GpuState {
    fn upload_scene(&mut self, scene: &Scene) -> Result<(), SceneError> {
        if self.released {
            return Err(SceneError::ContextUnavailable("renderer released".into()));
        }
        if let Some(old) = self.scene.take() {
            old.destroy();
        }
        self.scene = Some(SceneResources::upload(
            &self.device,
            &self.pipelines.object_layout,
            scene,
        ));
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        if self.released || viewport.is_degenerate() {
            return;
        }
        if (viewport.width, viewport.height) == self.size() {
            return;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(&self.device, &self.config);
        self.targets
            .recreate(&self.device, viewport.width, viewport.height);
        self.post.rebuild_bind_groups(&self.device, &self.targets);
        log::debug!("[render] resized to {}x{}", viewport.width, viewport.height);
    }

    fn draw(&mut self, frame: &FrameState) -> Result<(), SceneError> {
        if self.released {
            return Err(SceneError::Draw("renderer released".into()));
        }
        let Some(scene) = &self.scene else {
            return Ok(());
        };

        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::from_frame(frame, &scene.lights)),
        );
        scene.write_uniforms(&self.queue, frame);
        self.post
            .write_uniforms(&self.queue, &frame.bloom, self.targets.bloom_size());

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("[render] surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(SceneError::Draw(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            scene.draw(&mut rpass, &self.pipelines);
        }
        self.post.run(&mut encoder, &self.targets, &view);

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(scene) = self.scene.take() {
            scene.destroy();
        }
        self.targets.destroy();
        self.globals_buffer.destroy();
        self.device.destroy();
        log::info!("[render] released GPU resources");
    }
}

impl Drop for GpuState {
    fn drop(&mut self) {
        self.release();
    }
}
