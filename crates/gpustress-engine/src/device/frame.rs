/// One acquired swapchain image plus the encoder recording into it.
///
/// Dropping `surface_texture` after submission presents the image, so the frame
/// must be handed back to [`super::Gpu::submit`] promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
