//! Error types for the AI opponent
//!
//! Every variant ends in the same place: the random fallback move. They are
//! kept distinct so the UI and logs can say why.

/// Errors from requesting or interpreting a completion
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key in the configured environment variable
    #[error("No API key found in ${env_var}")]
    MissingApiKey { env_var: String },

    /// Transport failure or non-success HTTP status
    #[error("Completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body didn't have the expected shape
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// Response text contained no legal move
    #[error("No legal move in reply: {reply:?}")]
    NoLegalMove { reply: String },

    /// The position has no legal moves at all
    #[error("No legal moves available")]
    NoMovesAvailable,
}

/// Result type alias for AI operations
pub type AiResult<T> = Result<T, AiError>;
