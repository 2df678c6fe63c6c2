//! Bridge configuration
//!
//! Loaded from an optional JSON file; every field has a default, so an
//! empty object (or no file at all) is a valid configuration.
//!
//! ```json
//! {
//!   "server": "192.168.1.10",
//!   "cli_port": 9090,
//!   "username": "admin",
//!   "password": "secret",
//!   "elapsed_interval": 5,
//!   "log_mode": "development"
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use lms_session::{SessionConfig, DEFAULT_CLI_PORT};
use serde::Deserialize;
use squeeze_sync::logging::LoggingMode;
use squeeze_sync::EngineConfig;

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Media server host
    /// Default: "127.0.0.1"
    pub server: String,

    /// Media server CLI port
    /// Default: 9090
    pub cli_port: u16,

    pub username: Option<String>,
    pub password: Option<String>,

    /// Seconds between elapsed-time updates while playing
    /// Default: 5
    pub elapsed_interval: u64,

    /// "silent", "development" or "debug"
    /// Default: "development"
    pub log_mode: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            server: "127.0.0.1".to_string(),
            cli_port: DEFAULT_CLI_PORT,
            username: None,
            password: None,
            elapsed_interval: 5,
            log_mode: "development".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_cli_port(mut self, port: u16) -> Self {
        self.cli_port = port;
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_elapsed_interval(mut self, seconds: u64) -> Self {
        self.elapsed_interval = seconds;
        self
    }

    pub fn with_log_mode(mut self, mode: impl Into<String>) -> Self {
        self.log_mode = mode.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            return Err(BridgeError::Config("server must not be empty".to_string()));
        }

        if self.cli_port == 0 {
            return Err(BridgeError::Config("cli_port must not be 0".to_string()));
        }

        if self.elapsed_interval == 0 {
            return Err(BridgeError::Config(
                "elapsed_interval must be at least 1 second".to_string(),
            ));
        }

        if self.username.is_some() != self.password.is_some() {
            return Err(BridgeError::Config(
                "username and password must be set together".to_string(),
            ));
        }

        self.logging_mode()?;
        Ok(())
    }

    pub fn logging_mode(&self) -> Result<LoggingMode> {
        LoggingMode::parse(&self.log_mode)
            .ok_or_else(|| BridgeError::Config(format!("unknown log_mode {:?}", self.log_mode)))
    }

    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::new(self.server.clone()).with_port(self.cli_port);
        match (&self.username, &self.password) {
            (Some(user), Some(password)) => config.with_credentials(user.clone(), password.clone()),
            _ => config,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.server.clone())
            .with_elapsed_interval(Duration::from_secs(self.elapsed_interval))
    }
}
