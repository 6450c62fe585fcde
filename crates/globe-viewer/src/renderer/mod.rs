//! The main rendering orchestrator. Owns the GPU context, the shared scene
//! uniform, and the three overlay pipelines (globe, arcs, sprites).

pub mod context;
pub mod pipelines;

use std::sync::Arc;

use winit::window::Window;

use self::context::GfxContext;
use self::pipelines::{arcs::ArcPipeline, globe::GlobePipeline, sprites::SpritePipeline};
use crate::scene::{FrameGeometry, SceneUniformStd140};

pub struct Renderer {
    pub gfx: GfxContext,
    scene_ubo: wgpu::Buffer,
    scene_bind: wgpu::BindGroup,
    pub globe: GlobePipeline,
    pub arcs: ArcPipeline,
    pub sprites: SpritePipeline,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;

        let scene_layout = gfx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene UBO Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<
                            SceneUniformStd140,
                        >() as u64),
                    },
                    count: None,
                }],
            });

        let scene_ubo = gfx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene UBO"),
            size: std::mem::size_of::<SceneUniformStd140>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_bind = gfx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_ubo.as_entire_binding(),
            }],
        });

        let globe = GlobePipeline::new(&gfx.device, gfx.config.format, &scene_layout);
        let arcs = ArcPipeline::new(&gfx.device, gfx.config.format, &scene_layout);
        let sprites = SpritePipeline::new(&gfx.device, gfx.config.format, &scene_layout);

        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            scene_ubo,
            scene_bind,
            globe,
            arcs,
            sprites,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gfx.resize(new_size);
    }

    /// Uploads this frame's data and records the scene pass.
    pub fn render(
        &mut self,
        swap_view: &wgpu::TextureView,
        frame: &FrameGeometry,
        scene: &SceneUniformStd140,
    ) {
        self.gfx
            .queue
            .write_buffer(&self.scene_ubo, 0, bytemuck::bytes_of(scene));
        self.arcs
            .upload_beams(&self.gfx.device, &self.gfx.queue, &frame.beam_vertices);
        self.sprites
            .upload(&self.gfx.device, &self.gfx.queue, &frame.sprites);

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.004,
                            g: 0.004,
                            b: 0.016,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gfx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Opaque globe first, then blended overlays on top of it.
            self.globe.draw(&mut pass, &self.scene_bind);
            self.arcs.draw(&mut pass, &self.scene_bind);
            self.sprites.draw(&mut pass, &self.scene_bind);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
