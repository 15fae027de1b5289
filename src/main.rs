use anyhow::{anyhow, Context, Result};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use clap::{Parser, ValueEnum};
use shakmaty::Color as Side;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chess3d::core::settings_persistence::{load_settings, settings_path, write_settings};
use chess3d::core::{CorePlugin, GameSettings, GameState};
use chess3d::game::{ChessSession, GameMode, GamePlugin, PeerRole};
use chess3d::networking::NetworkingPlugin;
use chess3d::rendering::RenderingPlugin;
use chess3d::ui::menu::parse_join_address;
use chess3d::ui::UiPlugin;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SideArg {
    White,
    Black,
}

/// 3D chess against a hosted language model or another player
#[derive(Parser, Debug)]
#[command(name = "chess3d", version, about)]
struct Cli {
    /// Skip the menu and play the AI; the value is your side
    #[arg(long, value_enum, value_name = "SIDE", conflicts_with_all = ["local", "host", "join"])]
    vs_ai: Option<SideArg>,

    /// Skip the menu and play both sides on this machine
    #[arg(long, conflicts_with_all = ["host", "join"])]
    local: bool,

    /// Host an online game as White (port defaults to the configured one)
    #[arg(long, value_name = "PORT", num_args = 0..=1, conflicts_with = "join")]
    host: Option<Option<u16>>,

    /// Join an online game as Black
    #[arg(long, value_name = "ADDR")]
    join: Option<String>,

    /// Start from this position instead of the standard one
    #[arg(long)]
    fen: Option<String>,

    /// Completion model name, saved to settings
    #[arg(long)]
    model: Option<String>,

    /// Log filter, e.g. "info,chess3d=debug"
    #[arg(long)]
    log: Option<String>,
}

impl Cli {
    /// Apply overrides that belong in the settings file; true if any did
    fn apply_overrides(&self, settings: &mut GameSettings) -> bool {
        match &self.model {
            Some(model) if *model != settings.ai.model => {
                settings.ai.model = model.clone();
                true
            }
            _ => false,
        }
    }

    /// Mode requested on the command line, if any
    fn mode(&self, settings: &GameSettings) -> Result<Option<GameMode>> {
        if let Some(side) = self.vs_ai {
            let human = match side {
                SideArg::White => Side::White,
                SideArg::Black => Side::Black,
            };
            return Ok(Some(GameMode::VsAi {
                ai_color: human.other(),
            }));
        }
        if self.local {
            return Ok(Some(GameMode::Local));
        }
        if let Some(port) = self.host {
            let port = port.unwrap_or(settings.network.default_port);
            return Ok(Some(GameMode::Online {
                role: PeerRole::Host {
                    bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
                },
            }));
        }
        if let Some(addr) = &self.join {
            let addr = parse_join_address(addr, settings.network.default_port)
                .map_err(|e| anyhow!(e))?;
            return Ok(Some(GameMode::Online {
                role: PeerRole::Guest { addr },
            }));
        }
        Ok(None)
    }
}

fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let (mut settings, settings_note) = load_settings();
    let overridden = cli.apply_overrides(&mut settings);
    let log_filter = cli.log.clone().unwrap_or_else(|| settings.log_filter.clone());

    let start_mode = cli.mode(&settings)?;
    let session = match &cli.fen {
        Some(fen) => ChessSession::from_fen(fen).context("Invalid --fen")?,
        None => ChessSession::new(),
    };

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "chess3d".to_string(),
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter: log_filter,
                level: bevy::log::Level::INFO,
                ..default()
            }),
    );

    info!("[SETTINGS] {}", settings_note);
    if let Some(path) = dotenv {
        info!("[SETTINGS] Loaded environment from {:?}", path);
    }
    // The save system skips the freshly inserted resource, so persist
    // command line changes here
    if overridden {
        let path = settings_path();
        match write_settings(&path, &settings) {
            Ok(()) => info!("[SETTINGS] Saved model {} to {:?}", settings.ai.model, path),
            Err(e) => error!("[SETTINGS] {}", e),
        }
    }

    app.insert_resource(settings)
        .insert_resource(session)
        .add_plugins(EguiPlugin::default())
        .add_plugins(MeshPickingPlugin)
        .add_plugins(CorePlugin)
        .add_plugins(GamePlugin)
        .add_plugins(NetworkingPlugin)
        .add_plugins(RenderingPlugin)
        .add_plugins(UiPlugin);

    if let Some(mode) = start_mode {
        info!("[MENU] Skipping menu: {}", mode.describe());
        app.insert_resource(mode)
            .add_systems(Startup, skip_menu);
    }

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(anyhow!("chess3d exited with code {}", code)),
    }
}

fn skip_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}
