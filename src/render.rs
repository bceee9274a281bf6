use crate::constants::{BLOOM, CLEAR_COLOR, FOG_DENSITY, PARTICLE_COLOR_HEX, PARTICLE_OPACITY};
use crate::core::{hex_to_rgba, Camera, FieldPose};
use web_sys as web;

mod helpers;
mod particles;
mod post;
mod targets;

use particles::{create_particle_resources, ParticleResources, ParticleUniforms};
use post::{PostBindGroups, PostResources};
use targets::RenderTargets;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    particles: ParticleResources,
    targets: RenderTargets,
    post: PostResources,
    bind_groups: PostBindGroups,
    color: [f32; 4],
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        positions: &[[f32; 3]],
    ) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
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

        let particles = create_particle_resources(&device, helpers::HDR_FORMAT, positions);
        let targets = RenderTargets::new(&device, width, height);

        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::POST_WGSL.into()),
        });
        let post = post::create_post_resources(&device, &post_shader, format);
        let bind_groups = post.bind_groups(&device, &targets);
        log::info!(
            "[gpu] ready {}x{} format={:?} particles={}",
            width,
            height,
            format,
            particles.vertex_count
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            particles,
            targets,
            post,
            bind_groups,
            color: hex_to_rgba(PARTICLE_COLOR_HEX, PARTICLE_OPACITY),
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets = RenderTargets::new(&self.device, width, height);
            self.bind_groups = self.post.bind_groups(&self.device, &self.targets);
        }
    }

    /// Reapply the current surface configuration after a lost/outdated frame.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(&mut self, pose: &FieldPose) -> Result<(), wgpu::SurfaceError> {
        let aspect = self.config.width as f32 / self.config.height.max(1) as f32;
        let camera = Camera::new(aspect, pose.camera_z);
        let uniforms = ParticleUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            model: pose.model_matrix().to_cols_array_2d(),
            color: self.color,
            fog_density: FOG_DENSITY,
            _pad: [0.0; 3],
        };
        self.queue.write_buffer(
            &self.particles.uniform_buffer,
            0,
            bytemuck::bytes_of(&uniforms),
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: particles into the HDR scene target
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("particles_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.scene_view,
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
            rpass.set_pipeline(&self.particles.pipeline);
            rpass.set_bind_group(0, &self.particles.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.particles.vertex_buffer.slice(..));
            rpass.draw(0..self.particles.vertex_count, 0..1);
        }

        let (bw, bh) = self.targets.bloom_size;
        let bloom_res = [bw as f32, bh as f32];
        let full_res = [self.config.width as f32, self.config.height as f32];
        let u = &self.post.uniforms;
        post::write_post_uniforms(&self.queue, &u.bright, bloom_res, [0.0, 0.0], &BLOOM);
        post::write_post_uniforms(&self.queue, &u.blur_h, bloom_res, [1.0, 0.0], &BLOOM);
        post::write_post_uniforms(&self.queue, &u.blur_v, bloom_res, [0.0, 1.0], &BLOOM);
        post::write_post_uniforms(&self.queue, &u.composite, full_res, [0.0, 0.0], &BLOOM);

        // Pass 2: bright pass -> bloom_a
        post::blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.bright_pipeline,
            &self.bind_groups.bright,
            None,
        );
        // Pass 3: blur horizontal bloom_a -> bloom_b
        post::blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bind_groups.blur_h,
            None,
        );
        // Pass 4: blur vertical bloom_b -> bloom_a
        post::blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bind_groups.blur_v,
            None,
        );
        // Pass 5: composite to swapchain
        post::blit(
            &mut encoder,
            "composite",
            &view,
            CLEAR_COLOR,
            &self.post.composite_pipeline,
            &self.bind_groups.composite_scene,
            Some(&self.bind_groups.composite_bloom),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
