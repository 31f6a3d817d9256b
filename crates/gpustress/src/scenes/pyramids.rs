use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use cgmath::{Deg, Matrix4, Point3, Rad, Vector3};

use gpustress_engine::render::common::{create_uniform_buffer, uniform_entry};
use gpustress_engine::render::{RenderCtx, RenderTarget};
use gpustress_params::Scene;

use super::{SceneFrame, CLEAR_COLOR, OPENGL_TO_WGPU_MATRIX};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Degrees per millisecond of the shared Y rotation.
const SPIN_SPEED: f64 = 0.2;

/// Distance between neighbouring pyramids on every axis.
const SPACING: f32 = 3.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PyramidVertex {
    pos: [f32; 3],
    color: [f32; 3],
}

const APEX: [f32; 3] = [0.0, 1.0, 0.0];
const BASE: [[f32; 3]; 4] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
];
const FACE_COLORS: [[f32; 3]; 5] = [
    [1.0, 0.2, 0.2],
    [0.2, 1.0, 0.2],
    [0.2, 0.4, 1.0],
    [1.0, 0.9, 0.2],
    [0.6, 0.6, 0.6],
];

/// Four sides plus a two-triangle base.
const PYRAMID_VERTICES: u32 = 18;

fn pyramid_mesh() -> Vec<PyramidVertex> {
    let mut verts = Vec::with_capacity(PYRAMID_VERTICES as usize);
    for side in 0..4 {
        let color = FACE_COLORS[side];
        for pos in [BASE[side], BASE[(side + 1) % 4], APEX] {
            verts.push(PyramidVertex { pos, color });
        }
    }
    let color = FACE_COLORS[4];
    for i in [0, 2, 1, 0, 3, 2] {
        verts.push(PyramidVertex { pos: BASE[i], color });
    }
    verts
}

/// Grid offsets, back to front: z descending, then x, then y.
fn instance_offsets(counts: [u32; 3]) -> Vec<[f32; 3]> {
    let [nx, ny, nz] = counts;
    let total = [nx, ny, nz].iter().fold(1usize, |acc, &n| acc.saturating_mul(n as usize));
    let mut offsets = Vec::with_capacity(total);
    for z in (0..nz).rev() {
        for x in 0..nx {
            for y in 0..ny {
                offsets.push([x as f32 * SPACING, y as f32 * SPACING, z as f32 * SPACING]);
            }
        }
    }
    offsets
}

/// Splits `count` instances into runs of `per_batch`; the last run takes the remainder.
fn batch_ranges(count: u32, per_batch: u32) -> Vec<Range<u32>> {
    let per = per_batch.max(1);
    let batches = (count / per).max(1);
    (0..batches)
        .map(|i| {
            let start = i * per;
            let end = if i + 1 == batches { count } else { start + per };
            start..end
        })
        .collect()
}

/// Camera centred on the grid's x/y, backed off along -z by half the larger
/// side, looking down +z.
fn view_projection(counts: [u32; 3]) -> Matrix4<f32> {
    let [nx, ny, nz] = counts;
    let max_dim = nx.max(ny);
    let x = nx as f32 * 1.5 - 1.0;
    let y = ny as f32 * 1.5 - 1.0;

    let eye = Point3::new(x, y, -3.0 * (max_dim / 2) as f32);
    let center = Point3::new(x, y, nz as f32 * 1.5);
    let view = Matrix4::look_at_rh(eye, center, Vector3::unit_y());
    let proj = cgmath::frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 500.0);

    OPENGL_TO_WGPU_MATRIX * proj * view
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PyramidUniform {
    view_proj: [[f32; 4]; 4],
    angle: f32,
    loops: u32,
    _pad: [u32; 2],
}

/// The pyramid grid, drawn three ways from the same instance buffer:
/// one call for everything, one call per pyramid, or in fixed-size batches.
#[derive(Default)]
pub struct PyramidScene {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    ubo: Option<wgpu::Buffer>,
    mesh_vbo: Option<wgpu::Buffer>,

    instance_counts: [u32; 3],
    instance_vbo: Option<wgpu::Buffer>,

    depth_size: (u32, u32),
    depth_view: Option<wgpu::TextureView>,
}

impl PyramidScene {
    pub fn render(
        &mut self,
        scene: Scene,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &SceneFrame<'_>,
    ) {
        let params = frame.params;
        self.ensure_pipeline(ctx);
        self.ensure_instances(ctx, params.pyramids);
        self.ensure_depth(ctx, frame.size);

        if let Some(ubo) = self.ubo.as_ref() {
            let angle: Rad<f32> = Deg(frame.angle_degrees(SPIN_SPEED)).into();
            let u = PyramidUniform {
                view_proj: view_projection(params.pyramids).into(),
                angle: angle.0,
                loops: params.pyramid_shader_loops,
                _pad: [0; 2],
            };
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        let (Some(pipeline), Some(bind_group), Some(mesh), Some(instances), Some(depth)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.mesh_vbo.as_ref(),
            self.instance_vbo.as_ref(),
            self.depth_view.as_ref(),
        ) else {
            return;
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pyramid pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, mesh.slice(..));
        rpass.set_vertex_buffer(1, instances.slice(..));

        let count = params.pyramid_count();
        match scene {
            Scene::MultiDraw => {
                for i in 0..count {
                    rpass.draw(0..PYRAMID_VERTICES, i..i + 1);
                }
            }
            Scene::BatchDraw => {
                for range in batch_ranges(count, params.pyramids_per_batch()) {
                    rpass.draw(0..PYRAMID_VERTICES, range);
                }
            }
            _ => rpass.draw(0..PYRAMID_VERTICES, 0..count),
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pyramid shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/pyramid.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pyramid bgl"),
            entries: &[uniform_entry::<PyramidUniform>(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pyramid pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pyramid pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[mesh_layout(), instance_layout()],
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
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let ubo = create_uniform_buffer::<PyramidUniform>(ctx.device, "pyramid ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pyramid bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        let mesh = pyramid_mesh();
        let mesh_vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pyramid mesh vbo"),
            size: std::mem::size_of_val(mesh.as_slice()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        ctx.queue.write_buffer(&mesh_vbo, 0, bytemuck::cast_slice(&mesh));

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group = Some(bind_group);
        self.ubo = Some(ubo);
        self.mesh_vbo = Some(mesh_vbo);
    }

    fn ensure_instances(&mut self, ctx: &RenderCtx<'_>, counts: [u32; 3]) {
        if self.instance_counts == counts && self.instance_vbo.is_some() {
            return;
        }

        let offsets = instance_offsets(counts);
        log::info!(
            "pyramid grid {}x{}x{} ({} instances)",
            counts[0],
            counts[1],
            counts[2],
            offsets.len()
        );

        let vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pyramid instance vbo"),
            size: (std::mem::size_of_val(offsets.as_slice()) as u64).max(1),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        ctx.queue.write_buffer(&vbo, 0, bytemuck::cast_slice(&offsets));

        self.instance_counts = counts;
        self.instance_vbo = Some(vbo);
    }

    fn ensure_depth(&mut self, ctx: &RenderCtx<'_>, size: (u32, u32)) {
        let size = (size.0.max(1), size.1.max(1));
        if self.depth_size == size && self.depth_view.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pyramid depth"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        self.depth_size = size;
        self.depth_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
    }
}

const MESH_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const INSTANCE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

fn mesh_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PyramidVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRS,
    }
}

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn mesh_has_eighteen_vertices() {
        assert_eq!(pyramid_mesh().len(), PYRAMID_VERTICES as usize);
        assert_eq!(std::mem::size_of::<PyramidUniform>(), 80);
    }

    #[test]
    fn offsets_run_back_to_front() {
        let offsets = instance_offsets([2, 3, 4]);
        assert_eq!(offsets.len(), 24);
        assert_eq!(offsets[0], [0.0, 0.0, 9.0]);
        assert_eq!(offsets[1], [0.0, 3.0, 9.0]);
        assert_eq!(offsets[3], [3.0, 0.0, 9.0]);
        assert_eq!(offsets[23], [3.0, 6.0, 0.0]);
    }

    #[test]
    fn batches_cover_every_instance() {
        assert_eq!(batch_ranges(1000, 100).len(), 10);

        let ranges = batch_ranges(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);

        // More batches than instances: one pyramid per call.
        assert_eq!(batch_ranges(2, 1), vec![0..1, 1..2]);
    }

    #[test]
    fn grid_centre_is_in_front_of_the_camera() {
        let counts = [10, 10, 10];
        let vp = view_projection(counts);
        let clip = vp * Vector4::new(13.0, 14.0, 15.0, 1.0);
        let ndc_z = clip.z / clip.w;
        assert!(clip.w > 0.0);
        assert!((0.0..=1.0).contains(&ndc_z));
        assert!((clip.x / clip.w).abs() < 1.0);
        assert!((clip.y / clip.w).abs() < 1.0);
    }
}
