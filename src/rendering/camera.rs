//! Board camera
//!
//! One persistent 3D camera serves both the menu (egui draws on it) and the
//! game. In game it orbits the board centre and swings to sit behind the side
//! the local player controls; in hot-seat play it can follow the side to move.
//! Swings always take the shorter way round.

use crate::core::GameSettings;
use crate::game::mode::GameMode;
use crate::game::session::ChessSession;
use bevy::prelude::*;
use shakmaty::Color as Side;
use std::f32::consts::{PI, TAU};

const ORBIT_RATE: f32 = 4.0;

/// Orbit state of the board camera
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Current angle around the board's vertical axis; 0 is White's side
    pub yaw: f32,
    pub target_yaw: f32,
    pub distance: f32,
    pub height: f32,
    /// Adds a half turn on top of the perspective
    pub flipped: bool,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            target_yaw: 0.0,
            distance: 9.0,
            height: 9.5,
            flipped: false,
        }
    }
}

impl CameraRig {
    pub fn transform(&self) -> Transform {
        let position = Vec3::new(
            self.distance * self.yaw.sin(),
            self.height,
            self.distance * self.yaw.cos(),
        );
        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

/// Yaw that puts `side`'s first rank nearest the camera
pub fn perspective_yaw(side: Side) -> f32 {
    match side {
        Side::White => 0.0,
        Side::Black => PI,
    }
}

/// Wrap an angle into `(-PI, PI]`
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Move `current` toward `target` along the shorter arc by fraction `t`
pub fn orbit_step(current: f32, target: f32, t: f32) -> f32 {
    let delta = wrap_angle(target - current);
    if delta.abs() < 1e-4 {
        return target;
    }
    wrap_angle(current + delta * t)
}

pub(crate) fn spawn_camera(mut commands: Commands) {
    let rig = CameraRig::default();
    commands.spawn((Camera3d::default(), rig.transform(), rig, Name::new("Board Camera")));
    info!("[CAMERA] Board camera spawned");
}

/// Start each game looking from the right side, without a swing
pub(crate) fn reset_camera_rig(
    mode: Res<GameMode>,
    session: Res<ChessSession>,
    settings: Res<GameSettings>,
    mut rigs: Query<(&mut CameraRig, &mut Transform)>,
) {
    let side = mode.perspective(session.turn(), settings.rotate_camera_on_turn);
    for (mut rig, mut transform) in &mut rigs {
        rig.flipped = false;
        rig.target_yaw = perspective_yaw(side);
        rig.yaw = rig.target_yaw;
        *transform = rig.transform();
    }
}

pub(crate) fn update_camera_target(
    mode: Res<GameMode>,
    session: Res<ChessSession>,
    settings: Res<GameSettings>,
    mut rigs: Query<&mut CameraRig>,
) {
    let side = mode.perspective(session.turn(), settings.rotate_camera_on_turn);
    for mut rig in &mut rigs {
        let flip = if rig.flipped { PI } else { 0.0 };
        let target = wrap_angle(perspective_yaw(side) + flip);
        if rig.target_yaw != target {
            rig.target_yaw = target;
        }
    }
}

pub(crate) fn flip_on_key(keys: Res<ButtonInput<KeyCode>>, mut rigs: Query<&mut CameraRig>) {
    if keys.just_pressed(KeyCode::KeyF) {
        for mut rig in &mut rigs {
            rig.flipped = !rig.flipped;
            debug!("[CAMERA] Flipped: {}", rig.flipped);
        }
    }
}

pub(crate) fn orbit_camera(time: Res<Time>, mut rigs: Query<(&mut CameraRig, &mut Transform)>) {
    let t = 1.0 - (-ORBIT_RATE * time.delta_secs()).exp();
    for (mut rig, mut transform) in &mut rigs {
        if rig.yaw == rig.target_yaw {
            continue;
        }
        rig.yaw = orbit_step(rig.yaw, rig.target_yaw, t);
        *transform = rig.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_takes_shorter_arc() {
        //! From just below PI to just above -PI is a tiny step across the seam
        let current = PI - 0.1;
        let target = -PI + 0.1;
        let next = orbit_step(current, target, 0.5);
        let moved = wrap_angle(next - current);
        assert!(moved > 0.0 && moved < 0.2, "moved {}", moved);
    }

    #[test]
    fn test_orbit_reaches_target() {
        let mut yaw = 0.0;
        for _ in 0..500 {
            yaw = orbit_step(yaw, PI, 0.1);
        }
        assert!((wrap_angle(yaw - PI)).abs() < 1e-3);
    }

    #[test]
    fn test_white_perspective_looks_from_positive_z() {
        let rig = CameraRig::default();
        let transform = rig.transform();
        assert!(transform.translation.z > 0.0);
        assert!(transform.translation.x.abs() < 1e-5);

        let black = CameraRig {
            yaw: perspective_yaw(Side::Black),
            ..CameraRig::default()
        };
        assert!(black.transform().translation.z < 0.0);
    }
}
