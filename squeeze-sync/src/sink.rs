//! Seams between the engine and its two collaborators
//!
//! `CommandSink` is where outbound protocol commands go, `StateWriter` is
//! where published states go. Production wires them to `LmsSession` and
//! `StateStore`; tests substitute mocks or recorders.

use lms_session::LmsSession;
use state_store::{ChannelSchema, StateStore, StateValue};

use crate::model::PlayerId;

/// Destination for protocol commands
#[cfg_attr(test, mockall::automock)]
pub trait CommandSink: Send + Sync {
    /// Queue a command addressed to one player
    fn send_command(&self, player: &PlayerId, command: &str);

    /// Queue a server-level command
    fn send_server_command(&self, command: &str);

    /// Ask the server for one of its preferences
    fn query_server_pref(&self, name: &str);
}

impl CommandSink for LmsSession {
    fn send_command(&self, player: &PlayerId, command: &str) {
        if let Err(e) = self.send(player, command) {
            tracing::warn!("Failed to send {:?} to {}: {}", command, player, e);
        }
    }

    fn send_server_command(&self, command: &str) {
        if let Err(e) = self.send_server(command) {
            tracing::warn!("Failed to send {:?}: {}", command, e);
        }
    }

    fn query_server_pref(&self, name: &str) {
        if let Err(e) = self.query_pref(name) {
            tracing::warn!("Failed to query pref {}: {}", name, e);
        }
    }
}

/// Destination for channel declarations and acknowledged states
#[cfg_attr(test, mockall::automock)]
pub trait StateWriter: Send + Sync {
    fn declare_channel(&self, schema: ChannelSchema);

    fn write(&self, id: &str, value: StateValue, ack: bool);
}

impl StateWriter for StateStore {
    fn declare_channel(&self, schema: ChannelSchema) {
        let channel = schema.channel.id.clone();
        if let Err(e) = self.set_object_channel(schema) {
            tracing::warn!("Failed to declare channel {}: {}", channel, e);
        }
    }

    fn write(&self, id: &str, value: StateValue, ack: bool) {
        if let Err(e) = self.set_state(id, value, ack) {
            tracing::warn!("Failed to write state {}: {}", id, e);
        }
    }
}
