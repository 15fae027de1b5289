//! Rendering module - the 3D board scene
//!
//! Purely a view of the game state: nothing here changes the session.
//!
//! - `board` - 64 square entities on a base slab, click observers
//! - `pieces` - primitive-mesh pieces, rebuilt from the session on every change
//! - `highlight` - per-frame material tweening for selection, targets, last move, check
//! - `camera` - the persistent orbit camera
//! - `lighting` - key and fill lights for the game screen

pub mod board;
pub mod camera;
pub mod highlight;
pub mod lighting;
pub mod pieces;

pub use board::{square_to_world, BoardPalette, BoardSquare};
pub use camera::CameraRig;
pub use pieces::{PieceMaterials, PieceMeshes, PieceModel};

use crate::core::GameState;
use crate::game::system_sets::GameSystems;
use bevy::prelude::*;

/// Rendering plugin
///
/// Needs the asset and render plugins from `DefaultPlugins`, so it isn't
/// added in headless runs.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BoardPalette>()
            .init_resource::<PieceMeshes>()
            .init_resource::<PieceMaterials>()
            .insert_resource(ClearColor(Color::srgb(0.08, 0.09, 0.11)))
            .add_systems(Startup, camera::spawn_camera)
            .add_systems(
                OnEnter(GameState::InGame),
                (
                    board::create_board,
                    lighting::spawn_lighting,
                    camera::reset_camera_rig,
                ),
            )
            .add_systems(
                Update,
                (
                    pieces::sync_pieces_system,
                    highlight::tween_square_materials,
                    camera::update_camera_target,
                    camera::flip_on_key,
                )
                    .in_set(GameSystems::Visual),
            )
            .add_systems(Update, camera::orbit_camera);
    }
}
