//! Chess piece rendering
//!
//! Pieces are assembled from primitive meshes (cylinders, spheres, cones,
//! cuboids); each role is a short list of [`PiecePart`]s. The scene is not
//! patched move by move: whenever the session changes, every piece entity is
//! despawned and the set is spawned again from [`ChessSession::pieces`].
//!
//! Piece roots carry [`PieceModel`] and the click observer; the part meshes
//! are children, so clicks on them bubble up to the root.

use super::board::square_to_world;
use crate::core::GameState;
use crate::game::events::BoardChanged;
use crate::game::session::{color_name, ChessSession};
use crate::game::systems::on_piece_click;
use bevy::picking::pointer::PointerInteraction;
use bevy::prelude::*;
use shakmaty::{Color as Side, Piece, Role, Square};

/// Root entity of a rendered piece
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceModel {
    pub square: Square,
    pub piece: Piece,
}

/// One mesh of a piece, positioned relative to the piece root
#[derive(Clone)]
pub struct PiecePart {
    pub mesh: Handle<Mesh>,
    pub transform: Transform,
}

/// Mesh parts for every role
#[derive(Resource)]
pub struct PieceMeshes {
    pawn: Vec<PiecePart>,
    knight: Vec<PiecePart>,
    bishop: Vec<PiecePart>,
    rook: Vec<PiecePart>,
    queen: Vec<PiecePart>,
    king: Vec<PiecePart>,
}

impl PieceMeshes {
    pub fn parts(&self, role: Role) -> &[PiecePart] {
        match role {
            Role::Pawn => &self.pawn,
            Role::Knight => &self.knight,
            Role::Bishop => &self.bishop,
            Role::Rook => &self.rook,
            Role::Queen => &self.queen,
            Role::King => &self.king,
        }
    }
}

fn part(meshes: &mut Assets<Mesh>, mesh: impl Into<Mesh>, y: f32) -> PiecePart {
    PiecePart {
        mesh: meshes.add(mesh.into()),
        transform: Transform::from_xyz(0.0, y, 0.0),
    }
}

impl FromWorld for PieceMeshes {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world
            .get_resource_mut::<Assets<Mesh>>()
            .expect("Assets<Mesh> should be initialized before PieceMeshes");

        // Shared pedestal; every piece stands on it
        let base = part(&mut meshes, Cylinder::new(0.32, 0.12), 0.06);

        let pawn = vec![
            base.clone(),
            part(&mut meshes, Cone::new(0.2, 0.45), 0.34),
            part(&mut meshes, Sphere::new(0.14), 0.6),
        ];

        let mut knight_head = part(&mut meshes, Cuboid::new(0.18, 0.22, 0.42), 0.72);
        knight_head.transform.rotation = Quat::from_rotation_x(-0.5);
        knight_head.transform.translation.z = -0.08;
        let knight = vec![
            base.clone(),
            part(&mut meshes, Cylinder::new(0.2, 0.5), 0.37),
            knight_head,
        ];

        let bishop = vec![
            base.clone(),
            part(&mut meshes, Cone::new(0.22, 0.7), 0.47),
            part(&mut meshes, Sphere::new(0.16), 0.8),
            part(&mut meshes, Sphere::new(0.05), 0.98),
        ];

        let rook = vec![
            base.clone(),
            part(&mut meshes, Cylinder::new(0.22, 0.55), 0.395),
            part(&mut meshes, Cuboid::new(0.42, 0.16, 0.42), 0.75),
        ];

        let queen = vec![
            base.clone(),
            part(&mut meshes, Cone::new(0.25, 0.9), 0.57),
            part(&mut meshes, Cylinder::new(0.2, 0.08), 0.98),
            part(&mut meshes, Sphere::new(0.12), 1.1),
        ];

        let king = vec![
            base,
            part(&mut meshes, Cylinder::new(0.22, 0.95), 0.595),
            part(&mut meshes, Cylinder::new(0.26, 0.08), 1.1),
            part(&mut meshes, Cuboid::new(0.06, 0.3, 0.06), 1.3),
            part(&mut meshes, Cuboid::new(0.22, 0.06, 0.06), 1.34),
        ];

        Self {
            pawn,
            knight,
            bishop,
            rook,
            queen,
            king,
        }
    }
}

/// Shared white and black piece materials
#[derive(Resource)]
pub struct PieceMaterials {
    pub white: Handle<StandardMaterial>,
    pub black: Handle<StandardMaterial>,
}

impl PieceMaterials {
    pub fn for_side(&self, side: Side) -> Handle<StandardMaterial> {
        match side {
            Side::White => self.white.clone(),
            Side::Black => self.black.clone(),
        }
    }
}

impl FromWorld for PieceMaterials {
    fn from_world(world: &mut World) -> Self {
        let mut materials = world
            .get_resource_mut::<Assets<StandardMaterial>>()
            .expect("Assets<StandardMaterial> should be initialized before PieceMaterials");
        Self {
            white: materials.add(StandardMaterial {
                base_color: Color::srgb(0.92, 0.9, 0.85),
                perceptual_roughness: 0.35,
                ..default()
            }),
            black: materials.add(StandardMaterial {
                base_color: Color::srgb(0.12, 0.1, 0.1),
                perceptual_roughness: 0.35,
                metallic: 0.1,
                ..default()
            }),
        }
    }
}

/// Knights face the opponent
fn piece_rotation(side: Side) -> Quat {
    match side {
        Side::White => Quat::IDENTITY,
        Side::Black => Quat::from_rotation_y(std::f32::consts::PI),
    }
}

fn piece_name(piece: Piece, square: Square) -> String {
    format!("{} {:?} {}", color_name(piece.color), piece.role, square)
}

pub fn spawn_piece(
    commands: &mut Commands,
    meshes: &PieceMeshes,
    materials: &PieceMaterials,
    square: Square,
    piece: Piece,
) -> Entity {
    let material = materials.for_side(piece.color);
    commands
        .spawn((
            Transform::from_translation(square_to_world(square))
                .with_rotation(piece_rotation(piece.color)),
            Visibility::Inherited,
            PointerInteraction::default(),
            bevy::picking::Pickable::default(),
            PieceModel { square, piece },
            Name::new(piece_name(piece, square)),
            DespawnOnExit(GameState::InGame),
        ))
        .observe(on_piece_click)
        .with_children(|parent| {
            for part in meshes.parts(piece.role) {
                parent.spawn((
                    Mesh3d(part.mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    part.transform,
                    bevy::picking::Pickable::default(),
                ));
            }
        })
        .id()
}

/// Rebuild all pieces from the session whenever it changes
pub fn sync_pieces_system(
    mut commands: Commands,
    mut changed: MessageReader<BoardChanged>,
    session: Res<ChessSession>,
    existing: Query<Entity, With<PieceModel>>,
    meshes: Res<PieceMeshes>,
    materials: Res<PieceMaterials>,
) {
    let Some(latest) = changed.read().last() else {
        return;
    };
    debug!("[PIECES] Rebuilding for revision {}", latest.revision);

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let pieces = session.pieces();
    for (square, piece) in &pieces {
        spawn_piece(&mut commands, &meshes, &materials, *square, *piece);
    }
    debug!("[PIECES] Spawned {} pieces", pieces.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::BoardChanged;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<PieceMeshes>()
            .init_resource::<PieceMaterials>()
            .init_resource::<ChessSession>()
            .add_message::<BoardChanged>()
            .add_systems(Update, sync_pieces_system);
        app
    }

    fn piece_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&PieceModel>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn test_every_role_has_parts() {
        let app = app();
        let meshes = app.world().resource::<PieceMeshes>();
        for role in Role::ALL {
            assert!(meshes.parts(role).len() >= 2, "{:?} has too few parts", role);
        }
    }

    #[test]
    fn test_pieces_spawned_only_on_board_change() {
        let mut app = app();
        app.update();
        assert_eq!(piece_count(&mut app), 0);

        app.world_mut().write_message(BoardChanged { revision: 0 });
        app.update();
        assert_eq!(piece_count(&mut app), 32);
    }

    #[test]
    fn test_rebuild_matches_session() {
        //! After a capture the rebuilt scene has one piece fewer
        let mut app = app();
        app.world_mut().write_message(BoardChanged { revision: 0 });
        app.update();

        {
            let mut session = app.world_mut().resource_mut::<ChessSession>();
            for uci in ["e2e4", "d7d5", "e4d5"] {
                session.play_uci(uci).unwrap();
            }
        }
        app.world_mut().write_message(BoardChanged { revision: 3 });
        app.update();

        assert_eq!(piece_count(&mut app), 31);
        let on_d5 = app
            .world_mut()
            .query::<&PieceModel>()
            .iter(app.world())
            .find(|m| m.square == Square::D5)
            .map(|m| m.piece);
        assert_eq!(
            on_d5,
            Some(Piece {
                color: Side::White,
                role: Role::Pawn
            })
        );
    }
}
