use gpustress_engine::render::RenderCtx;

/// Color texture the scene draws into when `offscreen` is set, so that only
/// the fps overlay reaches the window.
///
/// Matches the surface format and size; recreated whenever either changes.
#[derive(Default)]
pub struct OffscreenTarget {
    format: Option<wgpu::TextureFormat>,
    size: (u32, u32),
    view: Option<wgpu::TextureView>,
}

impl OffscreenTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view matching the current surface, creating it if needed.
    pub fn view(&mut self, ctx: &RenderCtx<'_>) -> &wgpu::TextureView {
        if self.format != Some(ctx.surface_format) || self.size != ctx.target_size {
            self.format = Some(ctx.surface_format);
            self.size = ctx.target_size;
            self.view = None;
        }

        self.view.get_or_insert_with(|| {
            log::debug!(
                "offscreen target {}x{} {:?}",
                ctx.target_size.0,
                ctx.target_size.1,
                ctx.surface_format
            );
            create_view(ctx)
        })
    }
}

fn create_view(ctx: &RenderCtx<'_>) -> wgpu::TextureView {
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen color"),
        size: wgpu::Extent3d {
            width: ctx.target_size.0,
            height: ctx.target_size.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ctx.surface_format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
