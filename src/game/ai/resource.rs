//! AI status resource
//!
//! What the in-game panel shows about the opponent: whether it's waiting on
//! the API, what the model last said, and whether the move it played came
//! from the reply or from the random fallback.

use bevy::prelude::*;

#[derive(Resource, Debug, Default, Clone, Reflect)]
#[reflect(Resource)]
pub struct AiStatus {
    /// A completion request is in flight
    pub thinking: bool,
    /// Raw text of the last completion, if one arrived
    pub last_reply: Option<String>,
    /// SAN/UCI of the last move the AI played
    pub last_move: Option<String>,
    /// Why the last move was random, if it was
    pub last_fallback_reason: Option<String>,
    /// Number of moves the AI has played this session
    pub moves_played: u32,
    /// How many of those were random fallbacks
    pub fallbacks: u32,
}

impl AiStatus {
    pub fn last_was_fallback(&self) -> bool {
        self.last_fallback_reason.is_some()
    }
}
