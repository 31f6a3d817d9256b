use bytemuck::{Pod, Zeroable};

use gpustress_engine::render::common::{
    begin_color_pass, create_uniform_buffer, sampler_entry, texture_entry, triangle_list, uniform_entry,
};
use gpustress_engine::render::{RenderCtx, RenderTarget};

use super::images::checkerboard;
use super::{create_quad_buffer, create_rgba_texture, linear_sampler, quad_layout, SceneFrame, CLEAR_COLOR};

/// Large enough that the blur is bandwidth-bound on most GPUs.
const CHECKER_SIZE: u32 = 2048;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TextureUniform {
    texel: [f32; 2],
    radius: u32,
    flat: u32,
}

impl TextureUniform {
    fn new(flat: bool, radius: u32) -> Self {
        Self {
            texel: [1.0 / CHECKER_SIZE as f32; 2],
            radius,
            flat: u32::from(flat),
        }
    }

    /// Texture fetches per fragment.
    fn fetches(&self) -> u32 {
        if self.flat != 0 {
            0
        } else {
            let side = 2 * self.radius + 1;
            side * side
        }
    }
}

/// Fullscreen quad: either flat grey (fill-rate only) or a box blur over a
/// checkerboard (texture bandwidth).
#[derive(Default)]
pub struct TextureScene {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    ubo: Option<wgpu::Buffer>,
    quad_vbo: Option<wgpu::Buffer>,
    logged: Option<(bool, u32)>,
}

impl TextureScene {
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &SceneFrame<'_>) {
        self.ensure_resources(ctx);

        let params = frame.params;
        let u = TextureUniform::new(params.texture_flat, params.texture_fetch_radius);
        if self.logged != Some((params.texture_flat, params.texture_fetch_radius)) {
            log::info!(
                "texture scene: {} ({} fetches per fragment)",
                if params.texture_flat { "flat" } else { "blur" },
                u.fetches()
            );
            self.logged = Some((params.texture_flat, params.texture_fetch_radius));
        }
        if let Some(ubo) = self.ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        let (Some(pipeline), Some(bind_group), Some(quad)) =
            (self.pipeline.as_ref(), self.bind_group.as_ref(), self.quad_vbo.as_ref())
        else {
            return;
        };

        let mut rpass = begin_color_pass(target.encoder, target.color_view, "texture pass", Some(CLEAR_COLOR));
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.slice(..));
        rpass.draw(0..6, 0..1);
    }

    fn ensure_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("texture shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/texture.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture bgl"),
            entries: &[
                uniform_entry::<TextureUniform>(0, wgpu::ShaderStages::FRAGMENT),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("texture pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("texture pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[quad_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let checker = create_rgba_texture(
            ctx,
            "checkerboard",
            CHECKER_SIZE,
            CHECKER_SIZE,
            &checkerboard(CHECKER_SIZE, CHECKER_SIZE),
        );
        let sampler = linear_sampler(ctx, "checkerboard sampler", wgpu::AddressMode::ClampToEdge);
        let ubo = create_uniform_buffer::<TextureUniform>(ctx.device, "texture ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&checker),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group = Some(bind_group);
        self.ubo = Some(ubo);
        self.quad_vbo = Some(create_quad_buffer(ctx, "texture quad vbo"));
    }
}
