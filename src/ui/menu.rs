//! Start menu
//!
//! Picks the [`GameMode`] and a couple of settings, resets the session and
//! switches to [`GameState::InGame`].

use super::colors::UiColors;
use crate::core::{GameSettings, GameState, DEFAULT_PORT};
use crate::game::mode::{GameMode, PeerRole};
use crate::game::selection::Selection;
use crate::game::session::ChessSession;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use shakmaty::Color as Side;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};

/// Text fields of the menu, kept between frames
#[derive(Resource, Debug, Clone, Default)]
pub struct MenuForm {
    pub host_port: String,
    pub join_addr: String,
    pub model: String,
    pub error: Option<String>,
    initialized: bool,
}

impl MenuForm {
    fn fill_from(&mut self, settings: &GameSettings) {
        if self.initialized {
            return;
        }
        self.host_port = settings.network.default_port.to_string();
        self.join_addr = format!("127.0.0.1:{}", settings.network.default_port);
        self.model = settings.ai.model.clone();
        self.initialized = true;
    }
}

/// Button pressed on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    VsAi { human: Side },
    Local,
    Host,
    Join,
}

/// Port field → port number
pub fn parse_host_port(text: &str) -> Result<u16, String> {
    text.trim()
        .parse::<u16>()
        .map_err(|_| format!("'{}' is not a valid port", text.trim()))
}

/// `host[:port]` → socket address, resolving names and filling in the port
pub fn parse_join_address(text: &str, default_port: u16) -> Result<SocketAddr, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Enter the host's address".to_string());
    }
    if let Ok(addr) = text.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = text.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }
    let with_port = if text.contains(':') {
        text.to_string()
    } else {
        format!("{}:{}", text, default_port)
    };
    with_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| format!("Could not resolve '{}'", text))
}

/// Game mode for a menu choice, validating the network fields
pub fn mode_for_choice(
    choice: MenuChoice,
    form: &MenuForm,
    default_port: u16,
) -> Result<GameMode, String> {
    Ok(match choice {
        MenuChoice::VsAi { human } => GameMode::VsAi {
            ai_color: human.other(),
        },
        MenuChoice::Local => GameMode::Local,
        MenuChoice::Host => {
            let port = parse_host_port(&form.host_port)?;
            GameMode::Online {
                role: PeerRole::Host {
                    bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
                },
            }
        }
        MenuChoice::Join => GameMode::Online {
            role: PeerRole::Guest {
                addr: parse_join_address(&form.join_addr, default_port)?,
            },
        },
    })
}

#[derive(SystemParam)]
pub struct MenuParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub form: ResMut<'w, MenuForm>,
    pub settings: ResMut<'w, GameSettings>,
    pub mode: ResMut<'w, GameMode>,
    pub session: ResMut<'w, ChessSession>,
    pub selection: ResMut<'w, Selection>,
    pub next_state: ResMut<'w, NextState<GameState>>,
    pub exit: MessageWriter<'w, AppExit>,
}

pub fn menu_ui(mut params: MenuParams) {
    let Ok(ctx) = params.contexts.ctx_mut() else {
        return;
    };
    params.form.fill_from(&params.settings);

    let mut choice = None;

    egui::Window::new("chess3d")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .frame(
            egui::Frame::default()
                .fill(UiColors::BG_OVERLAY)
                .corner_radius(10.0)
                .inner_margin(24.0)
                .stroke(egui::Stroke::new(1.0, UiColors::BORDER)),
        )
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(
                    egui::RichText::new("chess3d")
                        .size(40.0)
                        .color(UiColors::ACCENT_GOLD),
                );
                ui.add_space(20.0);

                ui.label(egui::RichText::new("Versus AI").size(18.0).color(UiColors::TEXT_PRIMARY));
                ui.horizontal(|ui| {
                    if ui.button("Play White").clicked() {
                        choice = Some(MenuChoice::VsAi { human: Side::White });
                    }
                    if ui.button("Play Black").clicked() {
                        choice = Some(MenuChoice::VsAi { human: Side::Black });
                    }
                });
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Model").color(UiColors::TEXT_SECONDARY));
                    ui.text_edit_singleline(&mut params.form.model);
                });
                if params.settings.ai.api_key().is_none() {
                    ui.label(
                        egui::RichText::new(format!(
                            "${} is not set - the AI will play random moves",
                            params.settings.ai.api_key_env
                        ))
                        .size(12.0)
                        .color(UiColors::WARNING),
                    );
                }

                ui.add_space(14.0);
                ui.separator();
                ui.add_space(14.0);

                if ui.button(egui::RichText::new("Local two-player").size(16.0)).clicked() {
                    choice = Some(MenuChoice::Local);
                }

                ui.add_space(14.0);
                ui.separator();
                ui.add_space(14.0);

                ui.label(egui::RichText::new("Online").size(18.0).color(UiColors::TEXT_PRIMARY));
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Port").color(UiColors::TEXT_SECONDARY));
                    ui.add(egui::TextEdit::singleline(&mut params.form.host_port).desired_width(80.0));
                    if ui.button("Host (White)").clicked() {
                        choice = Some(MenuChoice::Host);
                    }
                });
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Address").color(UiColors::TEXT_SECONDARY));
                    ui.add(egui::TextEdit::singleline(&mut params.form.join_addr).desired_width(160.0));
                    if ui.button("Join (Black)").clicked() {
                        choice = Some(MenuChoice::Join);
                    }
                });

                if let Some(error) = &params.form.error {
                    ui.add_space(10.0);
                    ui.colored_label(UiColors::DANGER, error.as_str());
                }

                ui.add_space(20.0);
                if ui.button("Quit").clicked() {
                    params.exit.write(AppExit::Success);
                }
            });
        });

    let Some(choice) = choice else {
        return;
    };

    let default_port = params.settings.network.default_port;
    match mode_for_choice(choice, &params.form, default_port) {
        Ok(mode) => {
            let model = params.form.model.trim().to_string();
            if !model.is_empty() && model != params.settings.ai.model {
                info!("[SETTINGS] AI model set to {}", model);
                params.settings.ai.model = model;
            }
            params.form.error = None;
            *params.mode = mode;
            params.session.reset();
            params.selection.clear();
            info!("[MENU] Starting: {}", mode.describe());
            params.next_state.set(GameState::InGame);
        }
        Err(e) => {
            warn!("[MENU] {}", e);
            params.form.error = Some(e);
        }
    }
}
