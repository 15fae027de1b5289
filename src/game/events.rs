//! Game messages
//!
//! Every change to the [`super::session::ChessSession`] goes through one of the
//! request messages below, whoever caused it (a click, the AI task, the peer).
//! [`BoardChanged`] is written after each successful mutation.

use bevy::prelude::*;

/// Who asked for a move or reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum MoveOrigin {
    /// Pointer input on this machine
    Local,
    /// Completion API reply (or its random fallback)
    Ai,
    /// Received from the connected peer; never echoed back
    Remote,
}

/// Request to play a move given in UCI notation
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub uci: String,
    pub origin: MoveOrigin,
    /// Session revision the move was chosen for; dropped if the session has
    /// moved on by the time it is applied
    pub revision: Option<u64>,
}

impl MoveRequest {
    pub fn new(uci: impl Into<String>, origin: MoveOrigin) -> Self {
        Self {
            uci: uci.into(),
            origin,
            revision: None,
        }
    }

    /// A move that only makes sense at session `revision`
    pub fn for_revision(uci: impl Into<String>, origin: MoveOrigin, revision: u64) -> Self {
        Self {
            revision: Some(revision),
            ..Self::new(uci, origin)
        }
    }
}

/// Request to restart the game
///
/// With `fen` set the session loads that position, otherwise the standard
/// start. `history` replays SAN moves on top of the position (used by `SYNC`).
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ResetRequest {
    pub fen: Option<String>,
    pub history: Vec<String>,
    pub origin: MoveOrigin,
}

impl ResetRequest {
    pub fn standard(origin: MoveOrigin) -> Self {
        Self {
            fen: None,
            history: Vec::new(),
            origin,
        }
    }

    pub fn from_fen(fen: impl Into<String>, origin: MoveOrigin) -> Self {
        Self {
            fen: Some(fen.into()),
            history: Vec::new(),
            origin,
        }
    }
}

/// The session changed; the scene should be rebuilt from it
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardChanged {
    pub revision: u64,
}

/// A move was played on the session
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct MoveApplied {
    pub record: super::session::MoveRecord,
    pub origin: MoveOrigin,
}

/// The session was reset or loaded from a FEN
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SessionReset {
    /// `None` for a standard reset
    pub fen: Option<String>,
    pub origin: MoveOrigin,
}
