//! Error types for the state store

use thiserror::Error;

/// Errors returned by `StateStore` writes and declarations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Empty or malformed object/state id
    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    /// A declared state does not live under its channel
    #[error("State {state} is not part of channel {channel}")]
    OutsideChannel { state: String, channel: String },
}

/// Result type for state store operations
pub type Result<T> = std::result::Result<T, StoreError>;
