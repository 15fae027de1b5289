//! Scene lighting for the game screen

use crate::core::GameState;
use bevy::prelude::*;

pub(crate) fn spawn_lighting(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        DespawnOnExit(GameState::InGame),
        Name::new("Key Light"),
    ));

    // Fill from above so the far side of pieces isn't black
    commands.spawn((
        PointLight {
            intensity: 1_500_000.0,
            range: 40.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, 10.0, 0.0),
        DespawnOnExit(GameState::InGame),
        Name::new("Fill Light"),
    ));
}
