use bytemuck::{Pod, Zeroable};
use cgmath::{Deg, Matrix4, Vector3};

use gpustress_engine::render::common::{begin_color_pass, premul_alpha_blend, sampler_entry, texture_entry, triangle_list};
use gpustress_engine::render::{RenderCtx, RenderTarget};

use super::images::dial_face;
use super::{
    aligned_uniform_stride, create_quad_buffer, create_rgba_texture, linear_sampler, quad_layout,
    SceneFrame, CLEAR_COLOR, OPENGL_TO_WGPU_MATRIX,
};

const DIAL_TEXTURE_SIZE: u32 = 256;

/// Two faces plus two needles.
const DRAWS: usize = 4;

/// Degrees per millisecond for the slow (right) and fast (left) needle.
const SLOW_NEEDLE_SPEED: f64 = 0.005;
const FAST_NEEDLE_SPEED: f64 = 0.1;

/// Faces keep the texture's 4:3 needle proportions.
const SHRINK: f32 = 0.75;

const NEEDLE_TINT: [f32; 4] = [0.9, 0.15, 0.1, 1.0];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DialDraw {
    model: [[f32; 4]; 4],
    loops: u32,
    textured: u32,
    _pad: [u32; 2],
    tint: [f32; 4],
}

/// Two spinning gauges: textured faces running the per-pixel work loop,
/// with flat needles on top. Four draw calls per frame.
#[derive(Default)]
pub struct DialScene {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    draws_ubo: Option<wgpu::Buffer>,
    draw_stride: u64,
    quad_vbo: Option<wgpu::Buffer>,
}

impl DialScene {
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &SceneFrame<'_>) {
        self.ensure_resources(ctx);

        let draws = dial_draws(frame);
        if let Some(ubo) = self.draws_ubo.as_ref() {
            for (i, draw) in draws.iter().enumerate() {
                ctx.queue
                    .write_buffer(ubo, i as u64 * self.draw_stride, bytemuck::bytes_of(draw));
            }
        }

        let (Some(pipeline), Some(bind_group), Some(quad)) =
            (self.pipeline.as_ref(), self.bind_group.as_ref(), self.quad_vbo.as_ref())
        else {
            return;
        };

        let mut rpass = begin_color_pass(target.encoder, target.color_view, "dial pass", Some(CLEAR_COLOR));
        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, quad.slice(..));
        for i in 0..DRAWS {
            rpass.set_bind_group(0, bind_group, &[(i as u64 * self.draw_stride) as u32]);
            rpass.draw(0..6, 0..1);
        }
    }

    fn ensure_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("dial shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/dial.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("dial bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<DialDraw>() as u64),
                    },
                    count: None,
                },
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("dial pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("dial pipeline"),
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

        self.draw_stride = aligned_uniform_stride(ctx.device, std::mem::size_of::<DialDraw>());
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dial draws ubo"),
            size: self.draw_stride * DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let face = create_rgba_texture(
            ctx,
            "dial face",
            DIAL_TEXTURE_SIZE,
            DIAL_TEXTURE_SIZE,
            &dial_face(DIAL_TEXTURE_SIZE),
        );
        let sampler = linear_sampler(ctx, "dial sampler", wgpu::AddressMode::ClampToEdge);

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("dial bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &ubo,
                        offset: 0,
                        size: wgpu::BufferSize::new(std::mem::size_of::<DialDraw>() as u64),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&face),
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
        self.draws_ubo = Some(ubo);
        self.quad_vbo = Some(create_quad_buffer(ctx, "dial quad vbo"));
    }
}

/// Per-draw uniforms: left face, right face, left needle, right needle.
fn dial_draws(frame: &SceneFrame<'_>) -> [DialDraw; DRAWS] {
    let (w, h) = frame.size;
    let aspect = h.max(1) as f32 / w.max(1) as f32;

    let projection = OPENGL_TO_WGPU_MATRIX * cgmath::ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    let face = |x: f32| {
        Matrix4::from_translation(Vector3::new(x, 0.0, 0.0))
            * Matrix4::from_nonuniform_scale(aspect * SHRINK, SHRINK, 1.0)
    };
    let needle = |x: f32, angle: f32| {
        face(x)
            * Matrix4::from_angle_z(Deg(angle))
            * Matrix4::from_translation(Vector3::new(0.0, 0.5, 0.0))
            * Matrix4::from_nonuniform_scale(0.05, 0.3, 1.0)
    };

    let loops = frame.params.dial_shader_loops;
    let textured = |model: Matrix4<f32>, loops| DialDraw {
        model: (projection * model).into(),
        loops,
        textured: 1,
        _pad: [0; 2],
        tint: [1.0; 4],
    };
    let flat = |model: Matrix4<f32>| DialDraw {
        model: (projection * model).into(),
        // Needles stay cheap; only the faces carry the load.
        loops: 0,
        textured: 0,
        _pad: [0; 2],
        tint: NEEDLE_TINT,
    };

    [
        textured(face(-0.5), loops),
        textured(face(0.5), loops),
        flat(needle(-0.5, frame.angle_degrees(FAST_NEEDLE_SPEED))),
        flat(needle(0.5, frame.angle_degrees(SLOW_NEEDLE_SPEED))),
    ]
}
