use super::helpers;

pub(crate) const PORTAL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Depth attachment for the main pass, sized to the surface.
pub(crate) struct RenderTargets {
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, "main_depth", width, height);
        Self {
            depth_tex,
            depth_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        (self.depth_tex, self.depth_view) =
            helpers::create_depth_texture(device, "main_depth", width, height);
    }
}

/// Offscreen color + depth for one tile's portal scene.
///
/// The color view is bound as a texture by the main pass through
/// `bind_group`, so the group is rebuilt together with the textures.
pub(crate) struct PortalTarget {
    pub(crate) width: u32,
    pub(crate) height: u32,
    _color_tex: wgpu::Texture,
    pub(crate) color_view: wgpu::TextureView,
    _depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl PortalTarget {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> Self {
        let (color_tex, color_view) = helpers::create_color_texture(
            device,
            "portal_color",
            width,
            height,
            PORTAL_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, "portal_depth", width, height);
        let bind_group = helpers::texture_bind_group(device, layout, "portal_bg", &color_view, sampler);
        Self {
            width,
            height,
            _color_tex: color_tex,
            color_view,
            _depth_tex: depth_tex,
            depth_view,
            bind_group,
        }
    }

    #[inline]
    pub(crate) fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}
