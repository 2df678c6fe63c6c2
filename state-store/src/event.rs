//! Change notifications for state writes
//!
//! Every write that matches a subscription produces a `StateChange`
//! carrying the id, the written value and the ack flag.

use std::time::Instant;

use crate::value::StateValue;

/// A state write observed by subscribers
///
/// `ack == true` means the owner of the state confirmed the value;
/// `ack == false` is a request from someone else to change it.
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Full state id (`<channel>.<field>`)
    pub id: String,

    /// The value that was written
    pub value: StateValue,

    /// Whether the write was acknowledged
    pub ack: bool,

    /// When the write happened
    pub timestamp: Instant,
}

impl StateChange {
    pub fn new(id: impl Into<String>, value: StateValue, ack: bool) -> Self {
        Self {
            id: id.into(),
            value,
            ack,
            timestamp: Instant::now(),
        }
    }

    /// Split the id into `(channel, field)` at the last dot
    pub fn split_id(&self) -> Option<(&str, &str)> {
        self.id.rsplit_once('.')
    }
}

impl PartialEq for StateChange {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.id == other.id && self.value == other.value && self.ack == other.ack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_change_equality_ignores_timestamp() {
        let a = StateChange::new("Kitchen.volume", StateValue::Number(20), true);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = StateChange::new("Kitchen.volume", StateValue::Number(20), true);
        let c = StateChange::new("Kitchen.volume", StateValue::Number(20), false);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_split_id() {
        let change = StateChange::new("Living_Room.muting", StateValue::Bool(true), false);
        assert_eq!(change.split_id(), Some(("Living_Room", "muting")));

        let dotted = StateChange::new("Dr.Who.volume", StateValue::Number(1), false);
        assert_eq!(dotted.split_id(), Some(("Dr.Who", "volume")));

        let bare = StateChange::new("volume", StateValue::Number(1), false);
        assert_eq!(bare.split_id(), None);
    }
}
