//! Deduplicated publishing and pending write intents
//!
//! Every value the engine publishes goes through `publish`, which skips
//! writes equal to the last published value. Requests from the store side
//! go through `accept_intent`, which drops requests that would not change
//! anything or that repeat a request still waiting for confirmation.

use std::collections::HashMap;
use std::sync::Arc;

use state_store::{ChannelSchema, StateValue};

use crate::sink::StateWriter;

pub struct StateSynchronizer {
    writer: Arc<dyn StateWriter>,
    published: HashMap<String, StateValue>,
    pending: HashMap<String, StateValue>,
}

impl StateSynchronizer {
    pub fn new(writer: Arc<dyn StateWriter>) -> Self {
        Self {
            writer,
            published: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    pub fn declare(&self, schema: ChannelSchema) {
        self.writer.declare_channel(schema);
    }

    /// Write an acknowledged value unless it is already published
    ///
    /// Returns whether a write happened. Publishing a key settles any
    /// pending intent for it.
    pub fn publish(&mut self, key: &str, value: StateValue) -> bool {
        self.pending.remove(key);

        if self.published.get(key) == Some(&value) {
            tracing::trace!("{} unchanged, skipping write", key);
            return false;
        }

        tracing::debug!("Publishing {} = {}", key, value);
        self.writer.write(key, value.clone(), true);
        self.published.insert(key.to_string(), value);
        true
    }

    /// Record a requested change
    ///
    /// Returns `false` if the value is already published or is the
    /// outstanding request for this key.
    pub fn accept_intent(&mut self, key: &str, value: &StateValue) -> bool {
        if self.published.get(key) == Some(value) {
            return false;
        }
        if self.pending.get(key) == Some(value) {
            return false;
        }
        self.pending.insert(key.to_string(), value.clone());
        true
    }

    pub fn last_published(&self, key: &str) -> Option<&StateValue> {
        self.published.get(key)
    }

    pub fn pending_intent(&self, key: &str) -> Option<&StateValue> {
        self.pending.get(key)
    }
}

impl std::fmt::Debug for StateSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSynchronizer")
            .field("published", &self.published.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
