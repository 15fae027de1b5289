//! System organization using SystemSets
//!
//! Systems run in this order each frame:
//! 1. **Input** - poll the peer link, pointer-driven camera toggles
//! 2. **Execution** - apply move/reset requests to the session, drive the AI
//! 3. **Visual** - rebuild pieces, tween square tints, move the camera
//!
//! Click handling happens in observers, which write `MoveRequest`s that the
//! Execution set picks up in the same frame.

use bevy::prelude::*;

/// System execution order for game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum GameSystems {
    /// Input handling (network polling, keyboard)
    Input,

    /// Session mutation and AI task management
    Execution,

    /// Scene updates derived from the session
    Visual,
}
