use super::helpers::HDR_FORMAT;

/// Offscreen color targets for the bloom chain.
///
/// - `scene_*` holds the particle pass in `Rgba16Float` at full resolution.
/// - `bloom_*` are half-res ping-pong buffers for the bright pass and blur.
///
/// Textures are kept alongside their views so they outlive every bind group
/// built from them.
pub(crate) struct RenderTargets {
    _scene_tex: wgpu::Texture,
    pub(crate) scene_view: wgpu::TextureView,
    _bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    _bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
    pub(crate) bloom_size: (u32, u32),
}

/// Bloom buffers run at half the surface resolution.
#[inline]
fn bloom_extent(width: u32, height: u32) -> (u32, u32) {
    ((width.max(1) / 2).max(1), (height.max(1) / 2).max(1))
}

/// Sampleable HDR render target plus its default view.
fn hdr_target(
    device: &wgpu::Device,
    label: &str,
    (width, height): (u32, u32),
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&Default::default());
    (texture, view)
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let full = (width.max(1), height.max(1));
        let half = bloom_extent(width, height);
        let (scene_tex, scene_view) = hdr_target(device, "scene_tex", full);
        let (bloom_a, bloom_a_view) = hdr_target(device, "bloom_a", half);
        let (bloom_b, bloom_b_view) = hdr_target(device, "bloom_b", half);
        Self {
            _scene_tex: scene_tex,
            scene_view,
            _bloom_a: bloom_a,
            bloom_a_view,
            _bloom_b: bloom_b,
            bloom_b_view,
            bloom_size: half,
        }
    }
}
