//! Game mode selection
//!
//! Decides who controls each side and therefore who may move when.
//!
//! | Mode      | White            | Black            |
//! |-----------|------------------|------------------|
//! | `Local`   | pointer          | pointer          |
//! | `VsAi`    | pointer or AI    | AI or pointer    |
//! | `Online`  | host             | guest            |

use bevy::prelude::*;
use shakmaty::Color;
use std::net::SocketAddr;

/// How this instance takes part in the online game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRole {
    /// Listen for the peer on this address; plays White
    Host { bind: SocketAddr },
    /// Connect to the host at this address; plays Black
    Guest { addr: SocketAddr },
}

impl PeerRole {
    pub fn local_color(self) -> Color {
        match self {
            PeerRole::Host { .. } => Color::White,
            PeerRole::Guest { .. } => Color::Black,
        }
    }
}

/// Who controls which side
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Both sides played from this machine (hot-seat)
    Local,
    /// The completion API plays `ai_color`
    VsAi { ai_color: Color },
    /// One side is played by the connected peer
    Online { role: PeerRole },
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::VsAi {
            ai_color: Color::Black,
        }
    }
}

impl GameMode {
    /// Whether pointer input may move pieces of `turn`
    pub fn can_move_locally(self, turn: Color) -> bool {
        match self {
            GameMode::Local => true,
            GameMode::VsAi { ai_color } => turn != ai_color,
            GameMode::Online { role } => turn == role.local_color(),
        }
    }

    /// The AI's colour, if an AI plays
    pub fn ai_color(self) -> Option<Color> {
        match self {
            GameMode::VsAi { ai_color } => Some(ai_color),
            _ => None,
        }
    }

    pub fn is_online(self) -> bool {
        matches!(self, GameMode::Online { .. })
    }

    /// Which side the camera should sit behind
    ///
    /// Hot-seat follows the side to move when `follow_turn` is set.
    pub fn perspective(self, turn: Color, follow_turn: bool) -> Color {
        match self {
            GameMode::Local if follow_turn => turn,
            GameMode::Local => Color::White,
            GameMode::VsAi { ai_color } => ai_color.other(),
            GameMode::Online { role } => role.local_color(),
        }
    }

    pub fn describe(self) -> String {
        match self {
            GameMode::Local => "Local two-player".to_string(),
            GameMode::VsAi { ai_color } => {
                format!("Versus AI (AI plays {})", super::session::color_name(ai_color))
            }
            GameMode::Online {
                role: PeerRole::Host { bind },
            } => format!("Online host on {}", bind),
            GameMode::Online {
                role: PeerRole::Guest { addr },
            } => format!("Online guest of {}", addr),
        }
    }
}
