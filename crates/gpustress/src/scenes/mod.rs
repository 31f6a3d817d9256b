//! The stress scenes.
//!
//! Every scene renders into whatever color view it is handed (the swapchain
//! image, or the offscreen texture) and clears it first. Pipelines are built
//! lazily for the target format and rebuilt if it changes, the same way the
//! engine's HUD renderer does.

mod dial;
mod images;
mod long_shader;
mod pyramids;
mod texture;

use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;

use gpustress_engine::render::{RenderCtx, RenderTarget};
use gpustress_params::{Scene, StressParams};

pub use dial::DialScene;
pub use long_shader::LongShaderScene;
pub use pyramids::PyramidScene;
pub use texture::TextureScene;

/// Background every scene clears to.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Per-frame inputs shared by all scenes.
#[derive(Debug, Copy, Clone)]
pub struct SceneFrame<'a> {
    pub params: &'a StressParams,
    /// Milliseconds since startup; drives all animation.
    pub elapsed_ms: f64,
    /// Physical size of the color target.
    pub size: (u32, u32),
}

impl SceneFrame<'_> {
    /// `elapsed_ms * degrees_per_ms`, wrapped to `[0, 360)`.
    pub fn angle_degrees(&self, degrees_per_ms: f64) -> f32 {
        (self.elapsed_ms * degrees_per_ms).rem_euclid(360.0) as f32
    }
}

/// All scene renderers; only the active one does any work each frame.
#[derive(Default)]
pub struct Scenes {
    dial: DialScene,
    pyramids: PyramidScene,
    texture: TextureScene,
    long_shader: LongShaderScene,
}

impl Scenes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        scene: Scene,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &SceneFrame<'_>,
    ) {
        match scene {
            Scene::Dial => self.dial.render(ctx, target, frame),
            Scene::SingleDraw | Scene::MultiDraw | Scene::BatchDraw => {
                self.pyramids.render(scene, ctx, target, frame)
            }
            Scene::Texture => self.texture.render(ctx, target, frame),
            Scene::LongShader => self.long_shader.render(ctx, target, frame),
        }
    }
}

// ── shared geometry ───────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

/// Unit quad covering `[-1, 1]²`, two triangles, V down.
pub(crate) const QUAD: [QuadVertex; 6] = [
    QuadVertex { pos: [-1.0, 1.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [1.0, -1.0], uv: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, 1.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [1.0, -1.0], uv: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, -1.0], uv: [0.0, 1.0] },
];

const QUAD_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

pub(crate) fn quad_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRS,
    }
}

pub(crate) fn create_quad_buffer(ctx: &RenderCtx<'_>, label: &str) -> wgpu::Buffer {
    let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of_val(&QUAD) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    ctx.queue.write_buffer(&buffer, 0, bytemuck::cast_slice(&QUAD));
    buffer
}

// ── shared GPU helpers ────────────────────────────────────────────────────

/// cgmath produces OpenGL clip space (z in `[-1, 1]`); wgpu wants `[0, 1]`.
#[rustfmt::skip]
pub(crate) const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Uploads a tightly packed RGBA8 image and returns a view of it.
pub(crate) fn create_rgba_texture(
    ctx: &RenderCtx<'_>,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub(crate) fn linear_sampler(ctx: &RenderCtx<'_>, label: &str, mode: wgpu::AddressMode) -> wgpu::Sampler {
    ctx.device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: mode,
        address_mode_v: mode,
        address_mode_w: mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

/// Round `size` up to the device's dynamic uniform offset alignment.
pub(crate) fn aligned_uniform_stride(device: &wgpu::Device, size: usize) -> u64 {
    let align = u64::from(device.limits().min_uniform_buffer_offset_alignment.max(1));
    (size as u64).div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_wraps() {
        let params = StressParams::default();
        let frame = |elapsed_ms| SceneFrame {
            params: &params,
            elapsed_ms,
            size: (1, 1),
        };
        assert_eq!(frame(0.0).angle_degrees(0.2), 0.0);
        assert_eq!(frame(1000.0).angle_degrees(0.2), 200.0);
        assert_eq!(frame(2000.0).angle_degrees(0.2), 40.0);
    }

    #[test]
    fn quad_covers_clip_space() {
        for v in QUAD {
            assert_eq!(v.pos[0].abs(), 1.0);
            assert_eq!(v.pos[1].abs(), 1.0);
            // V grows downwards.
            assert_eq!(v.uv[1], (1.0 - v.pos[1]) / 2.0);
        }
    }
}
