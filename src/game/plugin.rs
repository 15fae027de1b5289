//! Game plugin - session, messages and gameplay systems
//!
//! Registers the session resources and the request/notification messages,
//! configures [`GameSystems`] ordering and adds the AI plugin. Contains no
//! rendering, so it can run headless under `MinimalPlugins`.
//!
//! # Plugin Dependencies
//!
//! - [`crate::core::CorePlugin`] - must be added first (state, settings)

use super::ai::AIPlugin;
use super::events::{BoardChanged, MoveApplied, MoveRequest, ResetRequest, SessionReset};
use super::mode::GameMode;
use super::selection::Selection;
use super::session::ChessSession;
use super::system_sets::GameSystems;
use super::systems::{apply_move_requests, apply_reset_requests};
use crate::core::GameState;
use bevy::prelude::*;

/// Game plugin
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChessSession>()
            .init_resource::<Selection>()
            .init_resource::<GameMode>();

        app.add_message::<MoveRequest>()
            .add_message::<ResetRequest>()
            .add_message::<BoardChanged>()
            .add_message::<MoveApplied>()
            .add_message::<SessionReset>();

        app.configure_sets(
            Update,
            (
                GameSystems::Input,
                GameSystems::Execution,
                GameSystems::Visual,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            Update,
            (apply_reset_requests, apply_move_requests)
                .chain()
                .in_set(GameSystems::Execution),
        );

        app.add_systems(OnEnter(GameState::InGame), announce_board);

        app.add_plugins(AIPlugin);
    }
}

/// Make sure the scene is built for whatever position the session holds
/// when a game screen opens.
fn announce_board(session: Res<ChessSession>, mode: Res<GameMode>, mut changed: MessageWriter<BoardChanged>) {
    info!(
        "[SESSION] Starting {} from {}",
        mode.describe(),
        session.fen()
    );
    changed.write(BoardChanged {
        revision: session.revision(),
    });
}
