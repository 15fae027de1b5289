//! Error types for the peer connection

/// Errors from the peer link
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// Socket or runtime setup failure
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line that isn't a valid peer message
    #[error("Invalid peer message: {0}")]
    Codec(#[from] serde_json::Error),

    /// The background connection task has stopped
    #[error("Peer link is closed")]
    ChannelClosed,
}

/// Result type alias for networking operations
pub type NetResult<T> = Result<T, NetError>;
