//! Chess game systems
//!
//! - [`input`] - observer-based click-to-select-move flow
//! - [`apply`] - the systems that mutate the session from request messages

pub mod apply;
pub mod input;

pub use apply::{apply_move_requests, apply_reset_requests, replay_history};
pub use input::{on_piece_click, on_square_click};
