//! Application state machine
//!
//! ```text
//! [Menu] ⇄ [InGame]
//! ```
//!
//! - **Menu**: mode selection (vs AI, hot-seat, host, join). Starting state.
//! - **InGame**: board, pieces and the in-game panel. Every entity spawned for a
//!   match carries `DespawnOnExit(GameState::InGame)` so leaving the game cleans up.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

/// Primary game state
#[derive(Clone, Copy, Resource, PartialEq, Eq, Hash, Debug, Default, States, Reflect)]
pub enum GameState {
    /// Mode selection screen
    #[default]
    Menu,

    /// A match is being played (or has ended and is still on screen)
    InGame,
}

/// Debug helper for logging the current state, toggled with F12
pub fn debug_current_gamestate(state: Res<State<GameState>>) {
    info!("[DEBUG] Current State: {:?}", state.get());
}

/// Log every state transition
pub fn log_state_transitions(mut transition_events: MessageReader<StateTransitionEvent<GameState>>) {
    for event in transition_events.read() {
        match (event.exited, event.entered) {
            (Some(exited), Some(entered)) if exited != entered => {
                info!("[TRANSITION] {:?} -> {:?}", exited, entered);
            }
            (None, Some(entered)) => {
                debug!("[TRANSITION] Enter: {:?}", entered);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_state_default() {
        let state = GameState::default();
        assert_eq!(state, GameState::Menu, "Game should start at the menu");
    }

    #[test]
    fn test_game_state_variants_distinct() {
        assert_ne!(GameState::Menu, GameState::InGame);
    }
}
