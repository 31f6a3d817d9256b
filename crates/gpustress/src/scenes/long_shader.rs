use bytemuck::{Pod, Zeroable};
use cgmath::{Deg, Matrix4};

use gpustress_engine::render::common::{
    begin_color_pass, create_uniform_buffer, premul_alpha_blend, sampler_entry, texture_entry, triangle_list,
    uniform_entry,
};
use gpustress_engine::render::{RenderCtx, RenderTarget};

use super::images::dial_face;
use super::{
    create_quad_buffer, create_rgba_texture, linear_sampler, quad_layout, SceneFrame, CLEAR_COLOR,
    OPENGL_TO_WGPU_MATRIX,
};

const DIAL_TEXTURE_SIZE: u32 = 256;

/// Degrees per millisecond; half the pyramid spin.
const SPIN_SPEED: f64 = 0.1;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LongShaderUniform {
    model: [[f32; 4]; 4],
    loops: u32,
    _pad: [u32; 3],
}

fn long_shader_uniform(frame: &SceneFrame<'_>) -> LongShaderUniform {
    let projection = OPENGL_TO_WGPU_MATRIX * cgmath::ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    let model = Matrix4::from_angle_z(Deg(frame.angle_degrees(SPIN_SPEED)));
    LongShaderUniform {
        model: (projection * model).into(),
        loops: frame.params.long_shader_loops,
        _pad: [0; 3],
    }
}

/// A rotating fullscreen quad whose fragment shader spins through
/// `long_shader_loops` iterations of dependent arithmetic per pixel.
#[derive(Default)]
pub struct LongShaderScene {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    ubo: Option<wgpu::Buffer>,
    quad_vbo: Option<wgpu::Buffer>,
}

impl LongShaderScene {
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &SceneFrame<'_>) {
        self.ensure_resources(ctx);

        if let Some(ubo) = self.ubo.as_ref() {
            ctx.queue
                .write_buffer(ubo, 0, bytemuck::bytes_of(&long_shader_uniform(frame)));
        }

        let (Some(pipeline), Some(bind_group), Some(quad)) =
            (self.pipeline.as_ref(), self.bind_group.as_ref(), self.quad_vbo.as_ref())
        else {
            return;
        };

        let mut rpass =
            begin_color_pass(target.encoder, target.color_view, "long shader pass", Some(CLEAR_COLOR));
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
            label: Some("long shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/long_shader.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("long shader bgl"),
            entries: &[
                uniform_entry::<LongShaderUniform>(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("long shader pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("long shader pipeline"),
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

        let face = create_rgba_texture(
            ctx,
            "long shader dial",
            DIAL_TEXTURE_SIZE,
            DIAL_TEXTURE_SIZE,
            &dial_face(DIAL_TEXTURE_SIZE),
        );
        let sampler = linear_sampler(ctx, "long shader sampler", wgpu::AddressMode::ClampToEdge);
        let ubo = create_uniform_buffer::<LongShaderUniform>(ctx.device, "long shader ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("long shader bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
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
        self.ubo = Some(ubo);
        self.quad_vbo = Some(create_quad_buffer(ctx, "long shader quad vbo"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpustress_params::StressParams;

    #[test]
    fn quarter_turn_after_900ms() {
        let params = StressParams {
            long_shader_loops: 350,
            ..StressParams::default()
        };
        let frame = SceneFrame {
            params: &params,
            elapsed_ms: 900.0,
            size: (640, 480),
        };

        let u = long_shader_uniform(&frame);
        assert_eq!(u.loops, 350);
        // 90° about Z maps +X onto +Y: first column is (0, 1, 0, 0).
        assert!(u.model[0][0].abs() < 1e-6);
        assert!((u.model[0][1] - 1.0).abs() < 1e-6);
        assert_eq!(std::mem::size_of::<LongShaderUniform>(), 80);
    }
}
