//! Keyed state storage with acknowledged writes
//!
//! This module provides the core storage primitives:
//! - `StoredState`: the last value written under an id, with its ack flag
//! - `StateStore`: object schemas, state values and change subscriptions

use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use crate::error::{Result, StoreError};
use crate::event::StateChange;
use crate::iter::ChangeIterator;
use crate::object::{ChannelObject, ChannelSchema, StateObject};
use crate::value::StateValue;

// ============================================================================
// StoredState
// ============================================================================

/// Last write applied to a state id
#[derive(Debug, Clone, PartialEq)]
pub struct StoredState {
    pub value: StateValue,
    pub ack: bool,
    pub timestamp: Instant,
    /// Number of writes applied to this id so far
    pub writes: u64,
}

// ============================================================================
// Subscription patterns
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Pattern {
    All,
    Prefix(String),
    Exact(String),
}

impl Pattern {
    fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            Pattern::All
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            Pattern::Prefix(prefix.to_string())
        } else {
            Pattern::Exact(pattern.to_string())
        }
    }

    fn matches(&self, id: &str) -> bool {
        match self {
            Pattern::All => true,
            Pattern::Prefix(prefix) => id.starts_with(prefix.as_str()),
            Pattern::Exact(exact) => id == exact,
        }
    }
}

// ============================================================================
// StateStore
// ============================================================================

#[derive(Default)]
struct Objects {
    channels: HashMap<String, ChannelObject>,
    states: HashMap<String, StateObject>,
}

/// State store shared between the bridge and its consumers
///
/// Every `set_state` call is applied and, if a subscription matches, queued
/// to `iter()`. The store does not deduplicate writes: repeated identical
/// writes are visible to subscribers and counted in `StoredState::writes`.
///
/// # Example
///
/// ```rust
/// use state_store::{StateStore, StateValue};
///
/// let store = StateStore::new();
/// store.subscribe_states("Kitchen.*");
///
/// store.set_state("Kitchen.volume", StateValue::Number(30), true).unwrap();
///
/// let change = store.iter().try_recv().unwrap();
/// assert_eq!(change.id, "Kitchen.volume");
/// assert!(change.ack);
/// ```
pub struct StateStore {
    objects: Arc<RwLock<Objects>>,
    states: Arc<RwLock<HashMap<String, StoredState>>>,
    subscriptions: Arc<RwLock<Vec<Pattern>>>,
    event_tx: mpsc::Sender<StateChange>,
    event_rx: Arc<Mutex<mpsc::Receiver<StateChange>>>,
}

impl StateStore {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        Self {
            objects: Arc::new(RwLock::new(Objects::default())),
            states: Arc::new(RwLock::new(HashMap::new())),
            subscriptions: Arc::new(RwLock::new(Vec::new())),
            event_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    /// Declare a channel and its states
    ///
    /// Re-declaring an existing channel overwrites its objects. Every state
    /// id must live under the channel (`<channel>.<field>`).
    pub fn set_object_channel(&self, schema: ChannelSchema) -> Result<()> {
        let channel_id = schema.channel.id.clone();
        if channel_id.trim().is_empty() {
            return Err(StoreError::InvalidId(channel_id));
        }

        let prefix = format!("{}.", channel_id);
        if let Some(stray) = schema.states.iter().find(|s| !s.id.starts_with(&prefix)) {
            return Err(StoreError::OutsideChannel {
                state: stray.id.clone(),
                channel: channel_id,
            });
        }

        let mut objects = self.objects.write();
        for state in schema.states {
            objects.states.insert(state.id.clone(), state);
        }
        objects.channels.insert(channel_id.clone(), schema.channel);

        tracing::debug!("Declared channel {}", channel_id);
        Ok(())
    }

    /// Write a value under `id`
    pub fn set_state(&self, id: &str, value: StateValue, ack: bool) -> Result<()> {
        if id.is_empty() || id.starts_with('.') || id.ends_with('.') {
            return Err(StoreError::InvalidId(id.to_string()));
        }

        {
            let mut states = self.states.write();
            let writes = states.get(id).map(|s| s.writes).unwrap_or(0) + 1;
            states.insert(
                id.to_string(),
                StoredState {
                    value: value.clone(),
                    ack,
                    timestamp: Instant::now(),
                    writes,
                },
            );
        }

        self.maybe_emit_change(id, value, ack);
        Ok(())
    }

    /// Get the last write for a state id
    pub fn get_state(&self, id: &str) -> Option<StoredState> {
        self.states.read().get(id).cloned()
    }

    /// Current value of a state id
    pub fn value(&self, id: &str) -> Option<StateValue> {
        self.states.read().get(id).map(|s| s.value.clone())
    }

    /// Number of writes applied to a state id
    pub fn write_count(&self, id: &str) -> u64 {
        self.states.read().get(id).map(|s| s.writes).unwrap_or(0)
    }

    pub fn state_object(&self, id: &str) -> Option<StateObject> {
        self.objects.read().states.get(id).cloned()
    }

    pub fn channel_object(&self, id: &str) -> Option<ChannelObject> {
        self.objects.read().channels.get(id).cloned()
    }

    /// Ids of all declared channels
    pub fn channel_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.objects.read().channels.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Register interest in state ids
    ///
    /// `*` matches everything, a trailing `*` matches a prefix, anything
    /// else matches one id exactly.
    pub fn subscribe_states(&self, pattern: &str) {
        let pattern = Pattern::parse(pattern);
        let mut subscriptions = self.subscriptions.write();
        if !subscriptions.contains(&pattern) {
            subscriptions.push(pattern);
        }
    }

    pub fn unsubscribe_states(&self, pattern: &str) {
        let pattern = Pattern::parse(pattern);
        self.subscriptions.write().retain(|p| p != &pattern);
    }

    pub fn is_subscribed(&self, id: &str) -> bool {
        self.subscriptions.read().iter().any(|p| p.matches(id))
    }

    /// Blocking iterator over changes of subscribed ids
    pub fn iter(&self) -> ChangeIterator {
        ChangeIterator::new(Arc::clone(&self.event_rx))
    }

    /// Sender for injecting changes from outside the store
    pub fn event_sender(&self) -> mpsc::Sender<StateChange> {
        self.event_tx.clone()
    }

    fn maybe_emit_change(&self, id: &str, value: StateValue, ack: bool) {
        if self.is_subscribed(id) {
            let _ = self.event_tx.send(StateChange::new(id, value, ack));
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StateStore {
    fn clone(&self) -> Self {
        Self {
            objects: Arc::clone(&self.objects),
            states: Arc::clone(&self.states),
            subscriptions: Arc::clone(&self.subscriptions),
            event_tx: self.event_tx.clone(),
            event_rx: Arc::clone(&self.event_rx),
        }
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("channels", &self.objects.read().channels.len())
            .field("states", &self.states.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ChannelNative, ValueType};
    use std::time::Duration;

    fn kitchen_schema() -> ChannelSchema {
        ChannelSchema {
            channel: ChannelObject {
                id: "Kitchen".to_string(),
                name: "Kitchen".to_string(),
                role: "media.music".to_string(),
                native: ChannelNative {
                    player_id: "00:04:20:aa:bb:cc".to_string(),
                    name: "Kitchen".to_string(),
                },
            },
            states: vec![
                StateObject::new("Kitchen.volume", ValueType::Number, "level.volume")
                    .writable()
                    .with_range(0.0, 100.0),
                StateObject::new("Kitchen.currentTitle", ValueType::String, "text"),
            ],
        }
    }

    #[test]
    fn test_set_object_channel() {
        let store = StateStore::new();
        store.set_object_channel(kitchen_schema()).unwrap();

        assert_eq!(store.channel_ids(), vec!["Kitchen".to_string()]);
        let volume = store.state_object("Kitchen.volume").unwrap();
        assert!(volume.write);
        assert_eq!(store.channel_object("Kitchen").unwrap().native.name, "Kitchen");
    }

    #[test]
    fn test_set_object_channel_rejects_foreign_state() {
        let store = StateStore::new();
        let mut schema = kitchen_schema();
        schema
            .states
            .push(StateObject::new("Bedroom.volume", ValueType::Number, "level.volume"));

        let err = store.set_object_channel(schema).unwrap_err();
        assert!(matches!(err, StoreError::OutsideChannel { .. }));
        assert!(store.channel_ids().is_empty());
    }

    #[test]
    fn test_set_and_get_state() {
        let store = StateStore::new();
        assert!(store.get_state("Kitchen.volume").is_none());

        store.set_state("Kitchen.volume", StateValue::Number(25), true).unwrap();
        let stored = store.get_state("Kitchen.volume").unwrap();
        assert_eq!(stored.value, StateValue::Number(25));
        assert!(stored.ack);
        assert_eq!(stored.writes, 1);
    }

    #[test]
    fn test_invalid_ids_rejected() {
        let store = StateStore::new();
        assert!(store.set_state("", StateValue::Bool(true), true).is_err());
        assert!(store.set_state("Kitchen.", StateValue::Bool(true), true).is_err());
    }

    #[test]
    fn test_repeated_writes_are_counted_and_emitted() {
        let store = StateStore::new();
        store.subscribe_states("*");

        store.set_state("Kitchen.power", StateValue::Bool(true), true).unwrap();
        store.set_state("Kitchen.power", StateValue::Bool(true), true).unwrap();

        assert_eq!(store.write_count("Kitchen.power"), 2);
        assert_eq!(store.iter().try_iter().count(), 2);
    }

    #[test]
    fn test_no_change_without_subscription() {
        let store = StateStore::new();
        store.set_state("Kitchen.power", StateValue::Bool(true), true).unwrap();

        assert!(store.iter().recv_timeout(Duration::from_millis(20)).is_none());
    }

    #[test]
    fn test_prefix_and_exact_subscriptions() {
        let store = StateStore::new();
        store.subscribe_states("Kitchen.*");
        store.subscribe_states("Bedroom.volume");

        assert!(store.is_subscribed("Kitchen.muting"));
        assert!(store.is_subscribed("Bedroom.volume"));
        assert!(!store.is_subscribed("Bedroom.muting"));

        store.unsubscribe_states("Kitchen.*");
        assert!(!store.is_subscribed("Kitchen.muting"));
    }

    #[test]
    fn test_unacknowledged_write_reaches_subscriber() {
        let store = StateStore::new();
        store.subscribe_states("*");

        store.set_state("Kitchen.muting", StateValue::Bool(true), false).unwrap();

        let change = store.iter().try_recv().unwrap();
        assert_eq!(change, StateChange::new("Kitchen.muting", StateValue::Bool(true), false));
    }

    #[test]
    fn test_clone_shares_state() {
        let store = StateStore::new();
        let cloned = store.clone();

        store.set_state("Kitchen.volume", StateValue::Number(10), true).unwrap();
        assert_eq!(cloned.value("Kitchen.volume"), Some(StateValue::Number(10)));
    }
}
