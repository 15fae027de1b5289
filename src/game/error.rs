//! Error types for game module
//!
//! Everything that can go wrong when feeding notation to the session.
//! The rules themselves never fail; they only say "illegal".

/// Errors that can occur in game logic
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// FEN could not be parsed or describes an impossible position
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Move text is not valid SAN/UCI syntax
    #[error("Unparseable move: {notation}")]
    UnparseableMove { notation: String },

    /// Move is well-formed but not legal in the current position
    #[error("Illegal move {notation} in position {fen}")]
    IllegalMove { notation: String, fen: String },

    /// The game already ended
    #[error("Game is over: {status}")]
    GameOver { status: String },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
