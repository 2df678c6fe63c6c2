//! Events emitted by the session
//!
//! The session decodes the server's line stream and hands out one
//! `SessionEvent` per meaningful line.

use std::fmt;

/// Hardware address of a player, normalized to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        PlayerId::new(s)
    }
}

/// Notification about one player
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerNotification {
    /// Any other player line, already split and decoded (player id removed)
    Line(Vec<String>),
    /// Volume tracked by the session after a `mixer volume` line
    Volume(u8),
    /// Raw argument of a `power` line
    Power(String),
    /// Wireless signal strength in percent
    SignalStrength(u8),
}

/// Event delivered to the session's consumer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Discovery finished; these players are known to the server
    Ready(Vec<PlayerId>),
    /// Something happened on a player
    Player {
        player: PlayerId,
        notification: PlayerNotification,
    },
    /// Reply to a `pref <name> ?` query
    ServerPref { name: String, value: String },
    /// The connection went away
    Disconnected,
}
