//! AI opponent backed by a hosted language model
//!
//! The model is asked for a move in plain text; whatever it says is parsed
//! back into a legal move. When the request fails or the reply names no legal
//! move, a random legal move is played instead so the game never stalls.
//!
//! # Flow
//!
//! 1. `spawn_ai_task_system` notices it's the AI's turn and spawns a task on
//!    the async compute pool with a snapshot of the position
//! 2. The task calls the [`CompletionClient`] and runs [`extract_move`] on the reply
//! 3. `poll_ai_task_system` picks up the result and submits a `MoveRequest`
//!    through the same path as human moves
//!
//! A reply computed for an older session revision (e.g. the user pressed
//! "New Game" mid-request) is discarded.

pub mod client;
pub mod error;
pub mod fallback;
pub mod prompt;
pub mod reply;
pub mod resource;
pub mod systems;

pub use client::{CompletionClient, GeminiClient};
pub use error::{AiError, AiResult};
pub use reply::extract_move;
pub use resource::AiStatus;
pub use systems::{decide_move, AIPlugin, AiDecision, PendingAIMove};
