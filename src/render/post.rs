use super::helpers;
use super::targets::RenderTargets;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) blur_dir: [f32; 2],
    pub(crate) bloom_strength: f32,
    pub(crate) threshold: f32,
    pub(crate) radius: f32,
    pub(crate) _pad: f32,
}

/// One uniform buffer per pass: `write_buffer` calls all land before the
/// submit, so passes sharing a buffer would only ever see the last write.
pub(crate) struct PassUniforms {
    pub(crate) bright: wgpu::Buffer,
    pub(crate) blur_h: wgpu::Buffer,
    pub(crate) blur_v: wgpu::Buffer,
    pub(crate) composite: wgpu::Buffer,
}

pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) uniforms: PassUniforms,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

pub(crate) struct PostBindGroups {
    pub(crate) bright: wgpu::BindGroup,
    pub(crate) blur_h: wgpu::BindGroup,
    pub(crate) blur_v: wgpu::BindGroup,
    pub(crate) composite_scene: wgpu::BindGroup,
    pub(crate) composite_bloom: wgpu::BindGroup,
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

fn uniform_buffer(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<PostUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    post_shader: &wgpu::ShaderModule,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
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
    let uniforms = PassUniforms {
        bright: uniform_buffer(device, "post_uniforms_bright"),
        blur_h: uniform_buffer(device, "post_uniforms_blur_h"),
        blur_v: uniform_buffer(device, "post_uniforms_blur_v"),
        composite: uniform_buffer(device, "post_uniforms_composite"),
    };
    let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
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
        "bright_pipeline",
        &pl_single,
        post_shader,
        "fs_bright",
        helpers::HDR_FORMAT,
    );
    let blur_pipeline = helpers::make_post_pipeline(
        device,
        "blur_pipeline",
        &pl_single,
        post_shader,
        "fs_blur",
        helpers::HDR_FORMAT,
    );
    let composite_pipeline = helpers::make_post_pipeline(
        device,
        "composite_pipeline",
        &pl_composite,
        post_shader,
        "fs_composite",
        swap_format,
    );

    PostResources {
        bgl0,
        bgl1,
        sampler,
        uniforms,
        bright_pipeline,
        blur_pipeline,
        composite_pipeline,
    }
}

impl PostResources {
    fn source_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        view: &wgpu::TextureView,
        uniforms: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        })
    }

    /// Bind groups reference target views, so they are rebuilt whenever the
    /// targets are recreated.
    pub(crate) fn bind_groups(
        &self,
        device: &wgpu::Device,
        targets: &RenderTargets,
    ) -> PostBindGroups {
        let composite_bloom = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_composite_bloom"),
            layout: &self.bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        PostBindGroups {
            bright: self.source_group(
                device,
                "bg_bright",
                &targets.scene_view,
                &self.uniforms.bright,
            ),
            blur_h: self.source_group(
                device,
                "bg_blur_h",
                &targets.bloom_a_view,
                &self.uniforms.blur_h,
            ),
            blur_v: self.source_group(
                device,
                "bg_blur_v",
                &targets.bloom_b_view,
                &self.uniforms.blur_v,
            ),
            composite_scene: self.source_group(
                device,
                "bg_composite_scene",
                &targets.scene_view,
                &self.uniforms.composite,
            ),
            composite_bloom,
        }
    }
}

pub(crate) fn write_post_uniforms(
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    resolution: [f32; 2],
    blur_dir: [f32; 2],
    bloom: &crate::constants::BloomSettings,
) {
    let u = PostUniforms {
        resolution,
        blur_dir,
        bloom_strength: bloom.strength,
        threshold: bloom.threshold,
        radius: bloom.radius,
        _pad: 0.0,
    };
    queue.write_buffer(buffer, 0, bytemuck::bytes_of(&u));
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
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
                load: wgpu::LoadOp::Clear(clear),
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
