use bytemuck::{Pod, Zeroable};

use crate::hud::{rasterize_digit_atlas, DigitMesh, MAX_GLYPHS, VERTICES_PER_GLYPH};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    begin_color_pass, create_uniform_buffer, premul_alpha_blend, sampler_entry, texture_entry,
    triangle_list, uniform_entry,
};

const MAX_VERTICES: usize = MAX_GLYPHS * VERTICES_PER_GLYPH;

/// Draws a [`DigitMesh`] over whatever is already in the target.
///
/// Positions and texcoords are uploaded into two fixed-size vertex buffers that
/// hold the largest possible run, so nothing is reallocated per frame. The digit
/// atlas is an `R8Unorm` coverage texture tinted by [`DigitRenderer::set_color`].
pub struct DigitRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    bind_group: Option<wgpu::BindGroup>,
    hud_ubo: Option<wgpu::Buffer>,
    atlas_view: Option<wgpu::TextureView>,
    sampler: Option<wgpu::Sampler>,

    position_vbo: Option<wgpu::Buffer>,
    texcoord_vbo: Option<wgpu::Buffer>,

    color: Color,
    warned_truncated: bool,
}

impl Default for DigitRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            hud_ubo: None,
            atlas_view: None,
            sampler: None,
            position_vbo: None,
            texcoord_vbo: None,
            color: Color::WHITE,
            warned_truncated: false,
        }
    }
}

impl DigitRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tint applied to glyph coverage (premultiplied).
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Issues one triangle-list draw of `mesh.vertex_count()` vertices.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mesh: &DigitMesh) {
        if mesh.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        self.ensure_vertex_buffers(ctx);
        self.ensure_bindings(ctx);

        let mut count = mesh.positions.len().min(mesh.texcoords.len());
        if count > MAX_VERTICES {
            if !self.warned_truncated {
                log::warn!("DigitRenderer: {count} vertices exceed capacity {MAX_VERTICES}; truncating");
                self.warned_truncated = true;
            }
            count = MAX_VERTICES;
        }

        self.write_uniform(ctx);

        let Some(position_vbo) = self.position_vbo.as_ref() else { return };
        let Some(texcoord_vbo) = self.texcoord_vbo.as_ref() else { return };
        ctx.queue
            .write_buffer(position_vbo, 0, bytemuck::cast_slice(&mesh.positions[..count]));
        ctx.queue
            .write_buffer(texcoord_vbo, 0, bytemuck::cast_slice(&mesh.texcoords[..count]));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = begin_color_pass(target.encoder, target.color_view, "gpustress digits pass", None);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, position_vbo.slice(..));
        rpass.set_vertex_buffer(1, texcoord_vbo.slice(..));
        rpass.draw(0..count as u32, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gpustress digits shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/digits.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gpustress digits bgl"),
            entries: &[
                uniform_entry::<HudUniform>(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gpustress digits pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gpustress digits pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[position_layout(), texcoord_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.hud_ubo = None;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_view.is_some() && self.sampler.is_some() {
            return;
        }

        let image = rasterize_digit_atlas();
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gpustress digit atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
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
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        // Glyph cells map 1:1 onto the quad; nearest keeps the dots sharp.
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gpustress digit sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.bind_group = None;
    }

    fn ensure_vertex_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.position_vbo.is_some() && self.texcoord_vbo.is_some() {
            return;
        }

        self.position_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gpustress digits position vbo"),
            size: (MAX_VERTICES * std::mem::size_of::<[f32; 3]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.texcoord_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gpustress digits texcoord vbo"),
            size: (MAX_VERTICES * std::mem::size_of::<[f32; 2]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.hud_ubo.is_some() {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        let hud_ubo = create_uniform_buffer::<HudUniform>(ctx.device, "gpustress digits ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gpustress digits bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: hud_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.hud_ubo = Some(hud_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.hud_ubo.as_ref() else { return };
        let u = HudUniform {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            _pad: [0.0; 2],
            color: self.color.to_array(),
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct HudUniform {
    viewport: [f32; 2],
    _pad: [f32; 2],
    color: [f32; 4],
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const TEXCOORD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRS,
    }
}

fn texcoord_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &TEXCOORD_ATTRS,
    }
}
