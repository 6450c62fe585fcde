//! Arc lines: persistent validator connections plus per-frame beam curves.
//!
//! Both sets share one pipeline; connections are uploaded once at startup,
//! beams are rebuilt from the registry every frame.

use wgpu::util::DeviceExt;

use crate::renderer::context::DEPTH_FORMAT;
use crate::renderer::pipelines::GrowBuffer;
use crate::scene::LineVertex;

pub struct ArcPipeline {
    pipeline: wgpu::RenderPipeline,
    connections: Option<wgpu::Buffer>,
    connection_count: u32,
    beams: GrowBuffer,
    beam_count: u32,
}

impl ArcPipeline {
    pub fn new(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        scene_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaders/arcs.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/arcs.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Arc PipelineLayout"),
            bind_group_layouts: &[scene_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Arc Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
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
                            format: wgpu::VertexFormat::Float32x4,
                        },
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                // Lines occlude behind the globe but never write depth.
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_fmt,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            connections: None,
            connection_count: 0,
            beams: GrowBuffer::vertex("Beam VB"),
            beam_count: 0,
        }
    }

    /// Uploads the static connection geometry; called once at startup.
    pub fn set_connections(&mut self, device: &wgpu::Device, vertices: &[LineVertex]) {
        self.connection_count = vertices.len() as u32;
        self.connections = (!vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Connection VB"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
    }

    /// Uploads this frame's beam geometry.
    pub fn upload_beams(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[LineVertex],
    ) {
        self.beam_count = vertices.len() as u32;
        self.beams
            .upload(device, queue, bytemuck::cast_slice(vertices));
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, scene_bind: &'a wgpu::BindGroup) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, scene_bind, &[]);

        if let Some(connections) = &self.connections {
            rpass.set_vertex_buffer(0, connections.slice(..));
            rpass.draw(0..self.connection_count, 0..1);
        }

        if self.beam_count > 0 {
            if let Some(slice) = self.beams.slice() {
                rpass.set_vertex_buffer(0, slice);
                rpass.draw(0..self.beam_count, 0..1);
            }
        }
    }
}
