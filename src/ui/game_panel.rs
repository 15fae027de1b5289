//! In-game side panel
//!
//! Status, opponent details, move list, FEN tools and the game buttons. All
//! session changes go out as `ResetRequest`s, same as any other source.

use super::colors::UiColors;
use crate::core::{GameSettings, GameState};
use crate::game::ai::AiStatus;
use crate::game::events::{MoveOrigin, ResetRequest};
use crate::game::mode::GameMode;
use crate::game::session::{color_name, ChessSession, GameStatus};
use crate::networking::NetworkSession;
use crate::rendering::CameraRig;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

/// FEN text box contents and the last load error
#[derive(Resource, Debug, Clone, Default)]
pub struct FenInput {
    pub text: String,
    pub error: Option<String>,
}

/// One numbered row of the move list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRow {
    pub number: usize,
    pub white: String,
    pub black: Option<String>,
}

/// Pair up SAN moves as `1. e4 e5`
pub fn move_rows(history: &[String]) -> Vec<MoveRow> {
    history
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| MoveRow {
            number: i + 1,
            white: pair[0].clone(),
            black: pair.get(1).cloned(),
        })
        .collect()
}

/// Shorten long model replies for display
pub fn truncate_reply(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let cut: String = single_line.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}

fn status_color(status: GameStatus) -> egui::Color32 {
    match status {
        GameStatus::Ongoing => UiColors::TEXT_PRIMARY,
        GameStatus::Check => UiColors::WARNING,
        GameStatus::Checkmate { .. } => UiColors::DANGER,
        _ => UiColors::ACCENT_GOLD,
    }
}

#[derive(SystemParam)]
pub struct GamePanelParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub session: Res<'w, ChessSession>,
    pub mode: Res<'w, GameMode>,
    pub settings: ResMut<'w, GameSettings>,
    pub ai_status: Res<'w, AiStatus>,
    pub network: Res<'w, NetworkSession>,
    pub fen_input: ResMut<'w, FenInput>,
    pub resets: MessageWriter<'w, ResetRequest>,
    pub next_state: ResMut<'w, NextState<GameState>>,
    pub rigs: Query<'w, 's, &'static mut CameraRig>,
}

pub fn game_panel_ui(mut params: GamePanelParams) {
    let Ok(ctx) = params.contexts.ctx_mut() else {
        return;
    };

    let session = &params.session;
    let status = session.status();
    let mode = *params.mode;

    let mut new_game = false;
    let mut load_fen = false;
    let mut flip = false;
    let mut to_menu = false;
    let mut show_hints = params.settings.show_hints;
    let mut highlight_last_move = params.settings.highlight_last_move;
    let mut rotate_camera = params.settings.rotate_camera_on_turn;

    egui::SidePanel::right("game_panel")
        .resizable(false)
        .default_width(290.0)
        .frame(
            egui::Frame::default()
                .fill(UiColors::BG_OVERLAY)
                .inner_margin(12.0)
                .stroke(egui::Stroke::new(1.0, UiColors::BORDER)),
        )
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(mode.describe())
                    .size(13.0)
                    .color(UiColors::TEXT_TERTIARY),
            );
            ui.add_space(6.0);

            // === STATUS ===
            if status.is_over() {
                ui.heading(
                    egui::RichText::new("Game over")
                        .size(22.0)
                        .color(UiColors::ACCENT_GOLD),
                );
            } else {
                ui.heading(
                    egui::RichText::new(format!("{} to move", color_name(session.turn())))
                        .size(22.0)
                        .color(UiColors::TEXT_PRIMARY),
                );
            }
            ui.label(
                egui::RichText::new(status.describe())
                    .size(15.0)
                    .color(status_color(status)),
            );

            // === OPPONENT ===
            if mode.ai_color().is_some() {
                ui.add_space(8.0);
                ui.separator();
                let ai = &params.ai_status;
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("AI").strong().color(UiColors::TEXT_SECONDARY));
                    if ai.thinking {
                        ui.spinner();
                        ui.label(egui::RichText::new("thinking...").color(UiColors::TEXT_TERTIARY));
                    }
                });
                ui.label(
                    egui::RichText::new(format!("Model: {}", params.settings.ai.model))
                        .size(12.0)
                        .color(UiColors::TEXT_TERTIARY),
                );
                if let Some(last) = &ai.last_move {
                    ui.label(format!("Last move: {}", last));
                }
                if let Some(reply) = &ai.last_reply {
                    ui.label(
                        egui::RichText::new(format!("Reply: \"{}\"", truncate_reply(reply, 80)))
                            .size(12.0)
                            .color(UiColors::TEXT_TERTIARY),
                    );
                }
                if let Some(reason) = &ai.last_fallback_reason {
                    ui.label(
                        egui::RichText::new(format!("Random fallback: {}", truncate_reply(reason, 80)))
                            .size(12.0)
                            .color(UiColors::WARNING),
                    );
                }
                if ai.moves_played > 0 {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} moves, {} random",
                            ai.moves_played, ai.fallbacks
                        ))
                        .size(12.0)
                        .color(UiColors::TEXT_TERTIARY),
                    );
                }
            }

            if mode.is_online() {
                ui.add_space(8.0);
                ui.separator();
                let network = &params.network;
                let color = if network.connected {
                    UiColors::SUCCESS
                } else {
                    UiColors::WARNING
                };
                ui.label(egui::RichText::new("Network").strong().color(UiColors::TEXT_SECONDARY));
                ui.colored_label(color, network.status_text());
                if let Some(error) = &network.last_error {
                    ui.label(
                        egui::RichText::new(truncate_reply(error, 80))
                            .size(12.0)
                            .color(UiColors::DANGER),
                    );
                }
                ui.label(
                    egui::RichText::new(format!(
                        "{} sent, {} received",
                        network.messages_sent, network.messages_received
                    ))
                    .size(12.0)
                    .color(UiColors::TEXT_TERTIARY),
                );
            }

            // === MOVES ===
            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new("Moves").strong().color(UiColors::TEXT_SECONDARY));
            egui::ScrollArea::vertical()
                .max_height(220.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    egui::Grid::new("move_list")
                        .num_columns(3)
                        .striped(true)
                        .show(ui, |ui| {
                            for row in move_rows(session.history()) {
                                ui.label(
                                    egui::RichText::new(format!("{}.", row.number))
                                        .color(UiColors::TEXT_TERTIARY),
                                );
                                ui.monospace(row.white);
                                ui.monospace(row.black.unwrap_or_default());
                                ui.end_row();
                            }
                        });
                });

            // === FEN ===
            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new("Position").strong().color(UiColors::TEXT_SECONDARY));
            let current_fen = session.fen();
            ui.add(
                egui::TextEdit::multiline(&mut current_fen.as_str())
                    .desired_rows(2)
                    .font(egui::TextStyle::Monospace),
            );
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut params.fen_input.text)
                        .hint_text("Paste FEN")
                        .desired_width(190.0),
                );
                if ui.button("Load").clicked() {
                    load_fen = true;
                }
            });
            if let Some(error) = &params.fen_input.error {
                ui.colored_label(UiColors::DANGER, error.as_str());
            }

            // === OPTIONS ===
            ui.add_space(8.0);
            ui.separator();
            ui.checkbox(&mut show_hints, "Show legal moves");
            ui.checkbox(&mut highlight_last_move, "Highlight last move");
            if mode == GameMode::Local {
                ui.checkbox(&mut rotate_camera, "Turn board each move");
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("New Game").clicked() {
                    new_game = true;
                }
                if ui.button("Flip Board").clicked() {
                    flip = true;
                }
                if ui.button("Menu").clicked() {
                    to_menu = true;
                }
            });
        });

    if show_hints != params.settings.show_hints {
        params.settings.show_hints = show_hints;
    }
    if highlight_last_move != params.settings.highlight_last_move {
        params.settings.highlight_last_move = highlight_last_move;
    }
    if rotate_camera != params.settings.rotate_camera_on_turn {
        params.settings.rotate_camera_on_turn = rotate_camera;
    }

    if new_game {
        params.resets.write(ResetRequest::standard(MoveOrigin::Local));
    }

    if load_fen {
        let text = params.fen_input.text.trim().to_string();
        match ChessSession::from_fen(&text) {
            Ok(_) => {
                params.fen_input.error = None;
                params.fen_input.text.clear();
                params.resets.write(ResetRequest::from_fen(text, MoveOrigin::Local));
            }
            Err(e) => params.fen_input.error = Some(e.to_string()),
        }
    }

    if flip {
        for mut rig in &mut params.rigs {
            rig.flipped = !rig.flipped;
        }
    }

    if to_menu {
        params.next_state.set(GameState::Menu);
    }
}
