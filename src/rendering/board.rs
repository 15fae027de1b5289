//! Board creation
//!
//! 64 square quads on top of a base slab, centred on the origin with one world
//! unit per square. Files run along +x (a → h), ranks along −z (1 → 8), so
//! White looks down −z from the +z side.
//!
//! Every square gets its own material so the highlight pass can tint squares
//! independently.

use crate::core::GameState;
use crate::game::systems::on_square_click;
use bevy::picking::pointer::PointerInteraction;
use bevy::prelude::*;
use shakmaty::Square;

/// Height of the square surface above the slab
const SQUARE_Y: f32 = 0.001;
const BASE_THICKNESS: f32 = 0.25;
const BASE_MARGIN: f32 = 0.4;

/// Board square entity
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSquare {
    pub square: Square,
}

impl BoardSquare {
    pub fn is_light(&self) -> bool {
        is_light_square(self.square)
    }
}

/// a1 is dark
pub fn is_light_square(square: Square) -> bool {
    (square.file() as u32 + square.rank() as u32) % 2 == 1
}

/// Centre of `square` on the board plane
pub fn square_to_world(square: Square) -> Vec3 {
    let file = square.file() as u32 as f32;
    let rank = square.rank() as u32 as f32;
    Vec3::new(file - 3.5, 0.0, 3.5 - rank)
}

/// Colours the board is built from
#[derive(Resource, Debug, Clone, Copy)]
pub struct BoardPalette {
    pub light: Color,
    pub dark: Color,
    pub base: Color,
    pub selected: Color,
    pub target: Color,
    pub last_move: Color,
    pub check: Color,
}

impl Default for BoardPalette {
    fn default() -> Self {
        Self {
            light: Color::srgb(0.93, 0.87, 0.76),
            dark: Color::srgb(0.46, 0.32, 0.22),
            base: Color::srgb(0.18, 0.12, 0.08),
            selected: Color::srgb(0.35, 0.75, 0.95),
            target: Color::srgb(0.45, 0.85, 0.45),
            last_move: Color::srgb(0.95, 0.85, 0.35),
            check: Color::srgb(0.95, 0.25, 0.2),
        }
    }
}

pub(crate) fn create_board(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    palette: Res<BoardPalette>,
) {
    let size = 8.0 + BASE_MARGIN * 2.0;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size, BASE_THICKNESS, size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: palette.base,
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::from_xyz(0.0, -BASE_THICKNESS / 2.0, 0.0),
        bevy::picking::Pickable::IGNORE,
        DespawnOnExit(GameState::InGame),
        Name::new("Board Base"),
    ));

    let square_mesh = meshes.add(Plane3d::default().mesh().size(1.0, 1.0));

    for square in Square::ALL {
        let board_square = BoardSquare { square };
        let color = if board_square.is_light() {
            palette.light
        } else {
            palette.dark
        };
        let material = materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: 0.6,
            ..default()
        });

        commands
            .spawn((
                Mesh3d(square_mesh.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(square_to_world(square) + Vec3::Y * SQUARE_Y),
                PointerInteraction::default(),
                board_square,
                DespawnOnExit(GameState::InGame),
                Name::new(format!("Square {}", square)),
            ))
            .observe(on_square_click);
    }

    info!("[BOARD] Spawned 64 squares");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_colours() {
        assert!(!is_light_square(Square::A1));
        assert!(is_light_square(Square::H1));
        assert!(is_light_square(Square::A8));
        assert!(!is_light_square(Square::H8));
        assert!(is_light_square(Square::D1));
        assert!(!is_light_square(Square::E1));
    }

    #[test]
    fn test_square_placement() {
        //! Files along +x, ranks along -z, centred on the origin
        assert_eq!(square_to_world(Square::A1), Vec3::new(-3.5, 0.0, 3.5));
        assert_eq!(square_to_world(Square::H8), Vec3::new(3.5, 0.0, -3.5));
        assert_eq!(square_to_world(Square::E4), Vec3::new(0.5, 0.0, 0.5));
    }
}
