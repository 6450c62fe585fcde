//! The globe itself: a procedural UV sphere with a graticule shader.

use geoarc::GLOBE_RADIUS;
use wgpu::util::DeviceExt;

use crate::renderer::context::DEPTH_FORMAT;

// Sphere tessellation; 64x64 keeps the graticule smooth at max zoom.
const STACKS: u32 = 64;
const SLICES: u32 = 64;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GlobeVertex {
    pos: [f32; 3],
    normal: [f32; 3],
}

pub struct GlobePipeline {
    pipeline: wgpu::RenderPipeline,
    vtx: wgpu::Buffer,
    idx: wgpu::Buffer,
    index_count: u32,
}

impl GlobePipeline {
    pub fn new(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        scene_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaders/globe.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/globe.wgsl").into()),
        });

        let (vertices, indices) = build_sphere(GLOBE_RADIUS);

        let vtx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe VB"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let idx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe IB"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Globe PipelineLayout"),
            bind_group_layouts: &[scene_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Globe Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GlobeVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            shader_location: 0,
                            offset: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            shader_location: 1,
                            offset: 12,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_fmt,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            vtx,
            idx,
            index_count: indices.len() as u32,
        }
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, scene_bind: &'a wgpu::BindGroup) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, scene_bind, &[]);
        rpass.set_vertex_buffer(0, self.vtx.slice(..));
        rpass.set_index_buffer(self.idx.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Standard UV sphere with per-vertex unit normals.
fn build_sphere(radius: f32) -> (Vec<GlobeVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((STACKS + 1) * (SLICES + 1)) as usize);

    for stack in 0..=STACKS {
        let phi = std::f32::consts::PI * stack as f32 / STACKS as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for slice in 0..=SLICES {
            let theta = std::f32::consts::TAU * slice as f32 / SLICES as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let normal = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            vertices.push(GlobeVertex {
                pos: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
            });
        }
    }

    let mut indices = Vec::with_capacity((STACKS * SLICES * 6) as usize);
    for stack in 0..STACKS {
        for slice in 0..SLICES {
            let a = stack * (SLICES + 1) + slice;
            let b = a + SLICES + 1;

            // Wound so outward faces survive back-face culling.
            indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
        }
    }

    (vertices, indices)
}
