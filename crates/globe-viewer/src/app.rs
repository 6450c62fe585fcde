use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use glam::Mat4;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorIcon, Window};

use geoarc::GLOBE_RADIUS;
use xrpl_feed::{FeedConfig, FeedEvent};

use crate::camera::{Camera, CameraController};
use crate::net::{self, FeedHandle};
use crate::picking::pick_validator;
use crate::renderer::Renderer;
use crate::scene::{self, SceneUniformStd140};
use crate::ui::{
    self, AppCommand, ConnectionStatus, HudStats, NotifyKind, TxPanel, TxPanelState, UiState,
    ValidatorLabel,
};
use crate::viz::validators::ConnectionPolicy;
use crate::viz::{transactions, AnimationRegistry, ValidatorNetwork};

/// Globe spin, radians per second.
const GLOBE_SPIN_RATE: f64 = 0.03;
/// Seconds between simulated validator-activity rounds.
const ACTIVITY_PERIOD: f64 = 5.0;
/// Labels float this far above the globe surface.
const LABEL_RADIUS: f32 = GLOBE_RADIUS * 1.16;
/// Max cursor travel between press and release that still counts as a click.
const CLICK_SLOP_PX: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedConfig,
    /// Transfers below this many drops never earn a beam.
    pub min_drops: u64,
    /// Seed for the connection heuristic and pulse phases.
    pub seed: u64,
}

pub struct App {
    pub renderer: Renderer,
    pub camera: Camera,
    pub camera_controller: CameraController,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,

    registry: AnimationRegistry,
    validators: ValidatorNetwork,
    ui: UiState,
    feed: FeedHandle,
    min_drops: u64,

    started: Instant,
    last_activity: f64,

    cursor: Option<(f64, f64)>,
    pressed_at: Option<(f64, f64)>,
}

impl App {
    pub async fn new(window: Arc<Window>, config: AppConfig) -> Result<Self> {
        let mut renderer = Renderer::new(window.clone()).await?;
        let size = renderer.gfx.size;

        let camera = Camera::new(size.width as f32 / size.height.max(1) as f32);
        let camera_controller = CameraController::new();

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        let validators = ValidatorNetwork::new(&ConnectionPolicy {
            seed: config.seed,
            ..ConnectionPolicy::default()
        });
        renderer
            .arcs
            .set_connections(&renderer.gfx.device, &scene::connection_vertices(&validators));

        let feed = net::spawn_feed(config.feed);

        let mut ui = UiState::new();
        ui.notify("XRP Ledger visualization started", NotifyKind::Success, 0.0);

        Ok(Self {
            renderer,
            camera,
            camera_controller,
            egui_ctx,
            egui_state,
            registry: AnimationRegistry::new(),
            validators,
            ui,
            feed,
            min_drops: config.min_drops,
            started: Instant::now(),
            last_activity: 0.0,
            cursor: None,
            pressed_at: None,
        })
    }

    /// Seconds on the app's monotonic clock; drives every animation.
    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn spin_matrix(&self, now: f64) -> Mat4 {
        Mat4::from_rotation_y((now * GLOBE_SPIN_RATE) as f32)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.camera
                .set_aspect(new_size.width as f32 / new_size.height as f32);
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        self.camera_controller.handle_event(event, &mut self.camera);

        match event {
            WindowEvent::Resized(physical_size) => self.resize(*physical_size),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x, position.y));
                self.update_hover(window);
            }
            WindowEvent::MouseInput { button, state, .. } if *button == MouseButton::Left => {
                match state {
                    ElementState::Pressed => self.pressed_at = self.cursor,
                    ElementState::Released => self.handle_click(),
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => self.ui.close_topmost(),
                    PhysicalKey::Code(KeyCode::Space) => {
                        self.dispatch(AppCommand::ToggleLegend);
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        false
    }

    /// Highlight-on-hover: pointer cursor while over a validator marker.
    fn update_hover(&self, window: &Window) {
        let hovered = self.pick_at_cursor().is_some();
        window.set_cursor_icon(if hovered {
            CursorIcon::Pointer
        } else {
            CursorIcon::Default
        });
    }

    fn pick_at_cursor(&self) -> Option<&'static crate::viz::validators::ValidatorRecord> {
        let cursor = self.cursor?;
        let size = self.renderer.gfx.size;
        let ray = self.camera.cursor_ray(
            (cursor.0 as f32, cursor.1 as f32),
            (size.width as f32, size.height as f32),
        );
        let model = self.spin_matrix(self.now());
        pick_validator(&ray, &model, &self.validators).map(|m| m.record)
    }

    /// A release close to its press selects the validator under the cursor.
    fn handle_click(&mut self) {
        let (Some(pressed), Some(cursor)) = (self.pressed_at.take(), self.cursor) else {
            return;
        };
        let travel = ((cursor.0 - pressed.0).powi(2) + (cursor.1 - pressed.1).powi(2)).sqrt();
        if travel > CLICK_SLOP_PX {
            return;
        }

        if let Some(record) = self.pick_at_cursor() {
            self.ui.selected_validator = Some(record);
        }
    }

    fn dispatch(&mut self, command: AppCommand) {
        match command {
            AppCommand::ShowLedgerDetail(ledger_index) => {
                self.ui.tx_panel = Some(TxPanel {
                    ledger_index,
                    state: TxPanelState::Loading,
                });
                self.feed.request_detail(ledger_index);
            }
            AppCommand::CloseTransactionPanel => self.ui.tx_panel = None,
            AppCommand::CloseValidatorInfo => self.ui.selected_validator = None,
            AppCommand::ToggleLegend => self.ui.legend_open = !self.ui.legend_open,
        }
    }

    /// Per-frame state advance: feed events, activity timer, registry tick.
    fn update(&mut self, now: f64) {
        loop {
            let event = match self.feed.events.try_recv() {
                Ok(event) => event,
                Err(_) => break,
            };
            self.apply_feed_event(event, now);
        }

        if now - self.last_activity >= ACTIVITY_PERIOD {
            self.validators.simulate_activity(now);
            self.last_activity = now;
        }

        self.registry.tick(now);
        self.ui.prune_notifications(now);
    }

    fn apply_feed_event(&mut self, event: FeedEvent, now: f64) {
        match event {
            FeedEvent::Connected => {
                self.ui.connection = ConnectionStatus::Connected;
                self.ui
                    .notify("Connected to XRP Ledger", NotifyKind::Success, now);
            }
            FeedEvent::Disconnected => {
                self.ui.connection = ConnectionStatus::Disconnected;
                self.ui.notify("Connection lost", NotifyKind::Error, now);
            }
            FeedEvent::LedgerClosed(closed) => {
                log::debug!(
                    "ledger #{} closed with {} transactions",
                    closed.ledger_index,
                    closed.txn_count
                );
                self.ui.push_block(&closed);
                // New block: some validators visibly take part.
                self.validators.simulate_activity(now);
            }
            FeedEvent::LedgerDetail {
                ledger_index,
                transactions,
                requested,
            } => {
                let spawned = transactions::ingest_batch(
                    &mut self.registry,
                    &transactions,
                    self.min_drops,
                    now,
                );
                log::debug!(
                    "visualized {spawned} of {} transactions from ledger #{ledger_index}",
                    transactions.len()
                );

                if requested {
                    if let Some(panel) = &mut self.ui.tx_panel {
                        if panel.ledger_index == ledger_index {
                            panel.state = TxPanelState::Loaded(transactions);
                        }
                    }
                }
            }
            FeedEvent::DetailFailed {
                ledger_index,
                requested,
            } => {
                if requested {
                    if let Some(panel) = &mut self.ui.tx_panel {
                        if panel.ledger_index == ledger_index {
                            panel.state = TxPanelState::Failed;
                        }
                    }
                }
            }
        }
    }

    /// Projects front-facing validator positions to egui screen points.
    fn validator_labels(&self, model: &Mat4) -> Vec<ValidatorLabel> {
        let size = self.renderer.gfx.size;
        let view_proj = self.camera.view_proj();
        let eye = self.camera.eye();
        let ppp = self.egui_ctx.pixels_per_point();

        let mut labels = Vec::new();
        for marker in self.validators.markers() {
            let surface = model.transform_point3(marker.position);

            // Markers on the far side get no label.
            if (eye - surface).dot(surface) <= 0.0 {
                continue;
            }

            let anchor = model.transform_point3(marker.record.geo.to_sphere(LABEL_RADIUS));
            let clip = view_proj * anchor.extend(1.0);
            if clip.w <= 0.0 {
                continue;
            }

            let px = (clip.x / clip.w + 1.0) * 0.5 * size.width as f32;
            let py = (1.0 - clip.y / clip.w) * 0.5 * size.height as f32;

            labels.push(ValidatorLabel {
                pos: egui::pos2(px / ppp, py / ppp),
                city: marker.record.city,
                country: marker.record.country,
            });
        }

        labels
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let now = self.now();
        self.update(now);

        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let model = self.spin_matrix(now);
        let geometry = scene::assemble(&self.registry, &self.validators, now);
        let scene_uniform = SceneUniformStd140::new(&self.camera, model);
        self.renderer.render(&swap_view, &geometry, &scene_uniform);

        // egui overlay on top of the scene.
        let labels = self.validator_labels(&model);
        let hud = HudStats {
            beams: self.registry.beam_count(),
            dots: self.registry.dot_count(),
        };

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);
        let commands = ui::draw(&self.egui_ctx, &self.ui, &hud, &labels);
        let egui_output = self.egui_ctx.end_frame();

        for command in commands {
            self.dispatch(command);
        }

        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
