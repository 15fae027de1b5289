//! Core plugin
//!
//! Sets up the state machine and keeps [`GameSettings`] persisted. Should be
//! added right after `DefaultPlugins` and before any gameplay plugin.
//!
//! The settings resource itself is inserted by `main` (it is needed to
//! configure `LogPlugin`); the plugin falls back to defaults when it's absent,
//! which is what the integration tests rely on.

use bevy::input::common_conditions::input_toggle_active;
use bevy::prelude::*;

use super::{
    settings_persistence::save_settings_system,
    states::{debug_current_gamestate, log_state_transitions},
    GameSettings, GameState,
};

/// Core plugin for the application
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>();

        if !app.world().contains_resource::<GameSettings>() {
            app.init_resource::<GameSettings>();
        }

        app.register_type::<GameSettings>();

        app.add_systems(Update, (log_state_transitions, save_settings_system));

        app.add_systems(
            Update,
            debug_current_gamestate.run_if(input_toggle_active(false, KeyCode::F12)),
        );
    }
}
