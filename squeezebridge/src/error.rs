use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(#[from] lms_session::SessionError),

    #[error("Sync error: {0}")]
    Sync(#[from] squeeze_sync::SyncError),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
