//! Object schemas
//!
//! Before states are written, their owner declares what they are: a channel
//! groups the states of one device, and each state object carries the
//! read/write/type/role metadata that consumers use to render or control it.

use serde::{Deserialize, Serialize};

/// Declared type of a state's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Boolean,
    Number,
    String,
}

/// Native identity attached to a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelNative {
    pub player_id: String,
    pub name: String,
}

/// Channel object grouping the states of one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelObject {
    pub id: String,
    pub name: String,
    pub role: String,
    pub native: ChannelNative,
}

/// State object describing a single value under a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateObject {
    /// Full state id (`<channel>.<field>`)
    pub id: String,
    pub read: bool,
    pub write: bool,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl StateObject {
    /// Readable, non-writable state
    pub fn new(id: impl Into<String>, value_type: ValueType, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            read: true,
            write: false,
            value_type,
            role: role.into(),
            min: None,
            max: None,
            desc: None,
        }
    }

    pub fn writable(mut self) -> Self {
        self.write = true;
        self
    }

    /// Write-only state (buttons)
    pub fn write_only(mut self) -> Self {
        self.read = false;
        self.write = true;
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }
}

/// A channel together with all of its states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSchema {
    pub channel: ChannelObject,
    pub states: Vec<StateObject>,
}

impl ChannelSchema {
    pub fn state(&self, id: &str) -> Option<&StateObject> {
        self.states.iter().find(|s| s.id == id)
    }
}
