//! Chess game logic module
//!
//! Game state lives in one resource, [`session::ChessSession`], which delegates
//! every rule question to `shakmaty`. The ECS side only routes requests to it:
//!
//! ```text
//! clicks ──┐
//! AI task ─┼─► MoveRequest / ResetRequest ─► apply systems ─► ChessSession
//! peer ────┘                                      │
//!                                                 ├─► BoardChanged (rendering)
//!                                                 └─► MoveApplied / SessionReset (networking)
//! ```
//!
//! # Module Organization
//!
//! - `session` - the position, history and status
//! - `mode` - who controls which side
//! - `events` - request and notification messages
//! - `selection` - click selection state
//! - `systems` - input observers and apply systems
//! - `ai` - remote completion opponent
//! - `plugin` - [`GamePlugin`]

pub mod ai;
pub mod error;
pub mod events;
pub mod mode;
pub mod plugin;
pub mod selection;
pub mod session;
pub mod system_sets;
pub mod systems;

pub use error::{GameError, GameResult};
pub use mode::{GameMode, PeerRole};
pub use plugin::GamePlugin;
pub use session::{ChessSession, GameStatus, MoveRecord};
