//! UI module - egui overlay
//!
//! - `menu` - start screen ([`GameState::Menu`])
//! - `game_panel` - side panel during play ([`GameState::InGame`])
//!
//! Both run in `EguiPrimaryContextPass` and draw on the persistent board
//! camera's context.

pub mod colors;
pub mod game_panel;
pub mod menu;

pub use game_panel::{FenInput, GamePanelParams};
pub use menu::{MenuChoice, MenuForm};

use crate::core::GameState;
use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

/// UI plugin
///
/// # Plugin Dependencies
///
/// - [`bevy_egui::EguiPlugin`]
/// - [`crate::networking::NetworkingPlugin`] and the game plugin, for the resources the panel reads
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MenuForm>()
            .init_resource::<FenInput>()
            .add_systems(
                EguiPrimaryContextPass,
                (
                    menu::menu_ui.run_if(in_state(GameState::Menu)),
                    game_panel::game_panel_ui.run_if(in_state(GameState::InGame)),
                ),
            );
    }
}
