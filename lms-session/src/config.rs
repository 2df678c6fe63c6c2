//! Configuration for the media server session

use std::time::Duration;

use crate::error::{Result, SessionError};

/// Default port of the server's command-line interface
pub const DEFAULT_CLI_PORT: u16 = 9090;

/// Connection settings for an `LmsSession`
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server host name or address
    /// Default: "127.0.0.1"
    pub host: String,

    /// CLI port
    /// Default: 9090
    pub cli_port: u16,

    /// Optional CLI credentials (sent as `login <user> <password>`)
    pub username: Option<String>,
    pub password: Option<String>,

    /// Upper bound passed to the `players` discovery query
    /// Default: 100
    pub max_players: u32,

    /// Timeout for establishing the TCP connection
    /// Default: 5 seconds
    pub connect_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            cli_port: DEFAULT_CLI_PORT,
            username: None,
            password: None,
            max_players: 100,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl SessionConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.cli_port = port;
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// `host:port` string used for connecting
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.cli_port)
        } else {
            format!("{}:{}", self.host, self.cli_port)
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(SessionError::Configuration("Server host must not be empty".to_string()));
        }

        if self.cli_port == 0 {
            return Err(SessionError::Configuration("CLI port must be greater than 0".to_string()));
        }

        if self.username.is_some() != self.password.is_some() {
            return Err(SessionError::Configuration(
                "Username and password must be given together".to_string(),
            ));
        }

        if self.max_players == 0 {
            return Err(SessionError::Configuration(
                "Max players must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout == Duration::ZERO {
            return Err(SessionError::Configuration(
                "Connect timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
