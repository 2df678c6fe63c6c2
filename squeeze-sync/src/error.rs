use thiserror::Error;

use crate::logging::LoggingError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session error: {0}")]
    Session(#[from] lms_session::SessionError),

    #[error("State store error: {0}")]
    Store(#[from] state_store::StoreError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Engine is no longer running")]
    EngineStopped,
}

pub type Result<T> = std::result::Result<T, SyncError>;
