//! Engine configuration

use std::time::Duration;

use crate::error::{Result, SyncError};

/// Configuration for the `SyncEngine`
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Host of the media server, used to build artwork URLs
    /// Default: "127.0.0.1"
    pub server_host: String,

    /// Period of the elapsed-time ticker; whole seconds are added per tick
    /// Default: 5 seconds
    pub elapsed_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            elapsed_interval: Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    pub fn new(server_host: impl Into<String>) -> Self {
        Self {
            server_host: server_host.into(),
            ..Default::default()
        }
    }

    pub fn with_elapsed_interval(mut self, interval: Duration) -> Self {
        self.elapsed_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_host.trim().is_empty() {
            return Err(SyncError::Configuration(
                "server_host must not be empty".to_string(),
            ));
        }

        if self.elapsed_interval.as_secs() == 0 {
            return Err(SyncError::Configuration(
                "elapsed_interval must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.elapsed_interval, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(EngineConfig::new("").validate().is_err());
        assert!(EngineConfig::new("lms.local")
            .with_elapsed_interval(Duration::from_millis(500))
            .validate()
            .is_err());
        assert!(EngineConfig::new("lms.local")
            .with_elapsed_interval(Duration::from_secs(2))
            .validate()
            .is_ok());
    }
}
