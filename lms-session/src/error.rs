use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in the media server session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Socket-level failure (connect, read, write, close)
    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connecting did not finish in time
    #[error("Timed out connecting to {address} after {timeout:?}")]
    ConnectTimeout { address: String, timeout: Duration },

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The session worker is gone
    #[error("Session channel has been closed")]
    ChannelClosed,
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
