//! egui overlay: status pill, ledger blocks, transaction and validator
//! panels, legend, toasts, and the on-globe validator labels.
//!
//! Drawing functions mutate nothing but the egui context; every user
//! interaction comes back as an [`AppCommand`] handled by the app's
//! dispatcher on the frame thread.

use std::collections::VecDeque;

use egui::{Align2, Color32, RichText};
use xrpl_feed::{format_drops_as_xrp, Amount, LedgerClosed, Transaction};

use crate::viz::validators::ValidatorRecord;

/// Toast lifetime, seconds.
pub const NOTIFICATION_SECS: f64 = 3.0;
/// The recent-blocks ring keeps this many entries.
pub const MAX_BLOCKS: usize = 10;

const GREEN: Color32 = Color32::from_rgb(0, 255, 136);
const ORANGE: Color32 = Color32::from_rgb(255, 170, 0);
const PINK: Color32 = Color32::from_rgb(255, 0, 136);
const RED: Color32 = Color32::from_rgb(255, 68, 68);
const BLUE: Color32 = Color32::from_rgb(100, 180, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone)]
pub struct LedgerBlock {
    pub index: u64,
    pub txn_count: u32,
    pub received: chrono::DateTime<chrono::Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
struct Notification {
    text: String,
    kind: NotifyKind,
    spawned_at: f64,
}

/// Transaction-panel content lifecycle.
#[derive(Debug, Clone)]
pub enum TxPanelState {
    Loading,
    Loaded(Vec<Transaction>),
    Failed,
}

#[derive(Debug, Clone)]
pub struct TxPanel {
    pub ledger_index: u64,
    pub state: TxPanelState,
}

/// Typed UI interactions, dispatched by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    ShowLedgerDetail(u64),
    CloseTransactionPanel,
    CloseValidatorInfo,
    ToggleLegend,
}

/// A validator label already projected to screen space.
pub struct ValidatorLabel {
    pub pos: egui::Pos2,
    pub city: &'static str,
    pub country: &'static str,
}

/// Counts shown in the HUD stat line.
pub struct HudStats {
    pub beams: usize,
    pub dots: usize,
}

pub struct UiState {
    pub connection: ConnectionStatus,
    pub blocks: VecDeque<LedgerBlock>,
    pub legend_open: bool,
    pub selected_validator: Option<&'static ValidatorRecord>,
    pub tx_panel: Option<TxPanel>,
    notifications: Vec<Notification>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            connection: ConnectionStatus::Connecting,
            blocks: VecDeque::new(),
            legend_open: true,
            selected_validator: None,
            tx_panel: None,
            notifications: Vec::new(),
        }
    }

    /// Records a close announcement at the head of the block ring.
    pub fn push_block(&mut self, closed: &LedgerClosed) {
        self.blocks.push_front(LedgerBlock {
            index: closed.ledger_index,
            txn_count: closed.txn_count,
            received: chrono::Local::now(),
        });
        self.blocks.truncate(MAX_BLOCKS);
    }

    pub fn notify(&mut self, text: impl Into<String>, kind: NotifyKind, now: f64) {
        self.notifications.push(Notification {
            text: text.into(),
            kind,
            spawned_at: now,
        });
    }

    /// Expires old toasts; called once per frame.
    pub fn prune_notifications(&mut self, now: f64) {
        self.notifications
            .retain(|n| now - n.spawned_at < NOTIFICATION_SECS);
    }

    /// Closes whatever panel is topmost; Escape behavior.
    pub fn close_topmost(&mut self) {
        if self.tx_panel.is_some() {
            self.tx_panel = None;
        } else {
            self.selected_validator = None;
        }
    }
}

/// Draws every overlay and returns the interactions to dispatch.
pub fn draw(
    ctx: &egui::Context,
    state: &UiState,
    hud: &HudStats,
    labels: &[ValidatorLabel],
) -> Vec<AppCommand> {
    let mut commands = Vec::new();

    draw_validator_labels(ctx, labels);
    draw_status(ctx, state.connection);
    draw_blocks(ctx, state, &mut commands);
    draw_transaction_panel(ctx, state, &mut commands);
    draw_validator_info(ctx, state, &mut commands);
    if state.legend_open {
        draw_legend(ctx);
    }
    draw_hud(ctx, hud);
    draw_notifications(ctx, state);

    commands
}

fn draw_validator_labels(ctx: &egui::Context, labels: &[ValidatorLabel]) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    for label in labels {
        painter.text(
            label.pos,
            Align2::CENTER_BOTTOM,
            label.city,
            egui::FontId::proportional(12.0),
            Color32::from_white_alpha(220),
        );
        painter.text(
            label.pos + egui::vec2(0.0, 13.0),
            Align2::CENTER_BOTTOM,
            label.country,
            egui::FontId::proportional(10.0),
            Color32::from_white_alpha(150),
        );
    }
}

fn draw_status(ctx: &egui::Context, connection: ConnectionStatus) {
    let (text, color) = match connection {
        ConnectionStatus::Connecting => ("Connecting to XRP Ledger...", ORANGE),
        ConnectionStatus::Connected => ("Connected to XRP Ledger", GREEN),
        ConnectionStatus::Disconnected => ("Connection lost", RED),
    };

    egui::Area::new(egui::Id::new("connection-status"))
        .anchor(Align2::LEFT_TOP, [12.0, 12.0])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("●").color(color));
                    ui.label(text);
                });
            });
        });
}

fn draw_blocks(ctx: &egui::Context, state: &UiState, commands: &mut Vec<AppCommand>) {
    egui::Window::new("XRP Ledger")
        .anchor(Align2::LEFT_TOP, [12.0, 56.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            if state.blocks.is_empty() {
                ui.weak("Waiting for ledger data...");
                return;
            }

            for (i, block) in state.blocks.iter().enumerate() {
                let heading = if i == 0 {
                    RichText::new(format!("#{}", block.index)).color(GREEN).strong()
                } else {
                    RichText::new(format!("#{}", block.index))
                };
                let line = format!(
                    "{} • {} txn",
                    block.received.format("%H:%M:%S"),
                    block.txn_count
                );

                if ui
                    .add(egui::Button::new(heading).small())
                    .on_hover_text(line)
                    .clicked()
                {
                    commands.push(AppCommand::ShowLedgerDetail(block.index));
                }
            }
        });
}

/// Panel color for a transferred amount, mirroring the block-explorer tiers
/// (over 10k XRP, over 1k XRP, everything else / issued currencies).
fn amount_color(amount: &Amount) -> Color32 {
    match amount {
        Amount::Drops(_) => match amount.drops() {
            Some(d) if d > 10_000 * 1_000_000 => PINK,
            Some(d) if d > 1_000 * 1_000_000 => ORANGE,
            _ => GREEN,
        },
        Amount::Issued { .. } => BLUE,
    }
}

fn truncated(field: Option<&str>) -> String {
    match field {
        Some(s) if s.chars().count() > 20 => {
            format!("{}...", s.chars().take(20).collect::<String>())
        }
        Some(s) => s.to_owned(),
        None => "N/A".to_owned(),
    }
}

fn draw_transaction_panel(ctx: &egui::Context, state: &UiState, commands: &mut Vec<AppCommand>) {
    let Some(panel) = &state.tx_panel else {
        return;
    };

    egui::Window::new(format!("Transactions in block #{}", panel.ledger_index))
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            match &panel.state {
                TxPanelState::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Fetching transactions...");
                    });
                }
                TxPanelState::Failed => {
                    ui.colored_label(RED, "Failed to fetch transactions.");
                }
                TxPanelState::Loaded(txs) if txs.is_empty() => {
                    ui.weak("No transactions in this block.");
                }
                TxPanelState::Loaded(txs) => {
                    egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                        for tx in txs {
                            draw_transaction_row(ui, tx);
                            ui.separator();
                        }
                    });
                }
            }

            ui.add_space(4.0);
            if ui.button("Close").clicked() {
                commands.push(AppCommand::CloseTransactionPanel);
            }
        });
}

fn draw_transaction_row(ui: &mut egui::Ui, tx: &Transaction) {
    ui.label(RichText::new(truncated(tx.hash.as_deref())).monospace().weak());

    ui.horizontal(|ui| {
        ui.label(format!(
            "Type: {}",
            tx.transaction_type.as_deref().unwrap_or("N/A")
        ));

        match &tx.amount {
            Some(amount) => {
                ui.colored_label(amount_color(amount), amount.display());
            }
            None => {
                ui.weak("N/A");
            }
        }
    });

    ui.label(format!(
        "From: {}   To: {}",
        truncated(tx.account.as_deref()),
        truncated(tx.destination.as_deref())
    ));

    let fee = tx
        .fee
        .as_deref()
        .map(format_drops_as_xrp)
        .unwrap_or_else(|| "N/A".to_owned());
    ui.weak(format!("Fee: {fee}"));
}

fn draw_validator_info(ctx: &egui::Context, state: &UiState, commands: &mut Vec<AppCommand>) {
    let Some(validator) = state.selected_validator else {
        return;
    };

    egui::Window::new("Validator")
        .anchor(Align2::LEFT_BOTTOM, [12.0, -12.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.strong(validator.name);
            ui.label(format!("{}, {}", validator.city, validator.country));
            ui.label(
                RichText::new(truncated(Some(validator.pubkey)))
                    .monospace()
                    .weak(),
            );
            ui.colored_label(GREEN, "Active");

            if ui.button("Close").clicked() {
                commands.push(AppCommand::CloseValidatorInfo);
            }
        });
}

fn draw_legend(ctx: &egui::Context) {
    egui::Window::new("Legend")
        .anchor(Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            let entry = |ui: &mut egui::Ui, color: Color32, text: &str| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("●").color(color));
                    ui.label(text);
                });
            };

            entry(ui, GREEN, "Validator node");
            entry(ui, GREEN, "Transfer (normal)");
            entry(ui, ORANGE, "Transfer (over 1 XRP)");
            entry(ui, PINK, "Transfer (over 10 XRP)");
            entry(ui, RED, "Sender");
            entry(ui, Color32::from_rgb(0, 255, 0), "Receiver");
            ui.weak("Space toggles this panel");
        });
}

fn draw_hud(ctx: &egui::Context, hud: &HudStats) {
    egui::Area::new(egui::Id::new("hud"))
        .anchor(Align2::CENTER_BOTTOM, [0.0, -8.0])
        .show(ctx, |ui| {
            ui.weak(format!(
                "{} beams, {} dots active  •  drag to orbit, scroll to zoom",
                hud.beams, hud.dots
            ));
        });
}

fn draw_notifications(ctx: &egui::Context, state: &UiState) {
    if state.notifications.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("notifications"))
        .anchor(Align2::RIGHT_TOP, [-12.0, 12.0])
        .show(ctx, |ui| {
            for n in &state.notifications {
                let color = match n.kind {
                    NotifyKind::Info => BLUE,
                    NotifyKind::Success => GREEN,
                    NotifyKind::Error => RED,
                };
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("●").color(color));
                        ui.label(&n.text);
                    });
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(index: u64) -> LedgerClosed {
        serde_json::from_str(&format!(
            r#"{{"ledger_index": {index}, "ledger_hash": "AA", "txn_count": 3}}"#
        ))
        .unwrap()
    }

    #[test]
    fn block_ring_keeps_newest_ten() {
        let mut state = UiState::new();
        for i in 0..15 {
            state.push_block(&closed(i));
        }

        assert_eq!(state.blocks.len(), MAX_BLOCKS);
        assert_eq!(state.blocks.front().unwrap().index, 14);
        assert_eq!(state.blocks.back().unwrap().index, 5);
    }

    #[test]
    fn notifications_expire_after_their_lifetime() {
        let mut state = UiState::new();
        state.notify("hello", NotifyKind::Info, 0.0);
        state.notify("late", NotifyKind::Error, 2.0);

        state.prune_notifications(NOTIFICATION_SECS + 1.0);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].text, "late");
    }

    #[test]
    fn escape_closes_the_transaction_panel_first() {
        let mut state = UiState::new();
        state.selected_validator = Some(&crate::viz::validators::VALIDATORS[0]);
        state.tx_panel = Some(TxPanel {
            ledger_index: 1,
            state: TxPanelState::Loading,
        });

        state.close_topmost();
        assert!(state.tx_panel.is_none());
        assert!(state.selected_validator.is_some());

        state.close_topmost();
        assert!(state.selected_validator.is_none());
    }
}
