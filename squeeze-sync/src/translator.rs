//! Translation of state change requests into player commands
//!
//! Only unacknowledged writes are requests; acknowledged ones are the
//! engine's own publications coming back and are ignored.

use state_store::{StateChange, StateValue};

use crate::engine::SyncEngine;
use crate::schema::Field;

/// Commands that carry out a request to set `field` to `value`
///
/// Returns `None` for read-only fields, for button requests that are not
/// presses and for values that cannot be interpreted.
pub fn translate(field: Field, value: &StateValue) -> Option<Vec<String>> {
    let commands: Vec<&str> = match field {
        Field::State => match normalize(field, value)?.as_i64() {
            Some(0) => vec!["pause"],
            Some(1) => vec!["power 1", "play"],
            _ => vec!["power 0"],
        },
        Field::Power => {
            if value.is_truthy() {
                vec!["power 1"]
            } else {
                vec!["power 0"]
            }
        }
        Field::Muting => {
            if value.is_truthy() {
                vec!["mixer muting 1"]
            } else {
                vec!["mixer muting 0"]
            }
        }
        Field::Volume => {
            let volume = normalize(field, value)?.as_i64()?;
            return Some(vec![format!("mixer volume {}", volume)]);
        }
        Field::Next | Field::Prev | Field::Stop | Field::Play | Field::Pause => {
            if !value.is_truthy() {
                return None;
            }
            vec![button_command(field)?]
        }
        _ => return None,
    };

    Some(commands.into_iter().map(str::to_string).collect())
}

fn button_command(field: Field) -> Option<&'static str> {
    match field {
        Field::Next => Some("playlist index +1"),
        Field::Prev => Some("playlist index -1"),
        Field::Stop => Some("stop"),
        Field::Play => Some("play"),
        Field::Pause => Some("pause 1"),
        _ => None,
    }
}

/// Value in the form the engine publishes for `field`
///
/// Any play state other than pause or play means power off, which is
/// published as stopped. `None` when a volume is not numeric.
fn normalize(field: Field, value: &StateValue) -> Option<StateValue> {
    match field {
        Field::Power | Field::Muting => Some(StateValue::Bool(value.is_truthy())),
        Field::State => {
            let state = match value.as_i64() {
                Some(state @ (0 | 1)) => state,
                _ => 2,
            };
            Some(StateValue::Number(state))
        }
        Field::Volume => {
            let volume = value.as_f64()?.round().clamp(0.0, 100.0) as i64;
            Some(StateValue::Number(volume))
        }
        _ => Some(value.clone()),
    }
}

impl SyncEngine {
    pub fn handle_state_change(&mut self, change: StateChange) {
        if change.ack {
            return;
        }

        let Some((channel, key)) = change.split_id() else {
            tracing::debug!("Ignoring request for malformed id {:?}", change.id);
            return;
        };
        let Some(field) = Field::from_key(key) else {
            tracing::debug!("Ignoring request for unknown field {}", change.id);
            return;
        };
        let Some(player) = self.registry.find(channel).map(|device| device.id().clone()) else {
            tracing::debug!("Ignoring request for unknown channel {}", channel);
            return;
        };

        let Some(commands) = translate(field, &change.value) else {
            tracing::debug!("Nothing to send for {} = {}", change.id, change.value);
            return;
        };

        let requested = normalize(field, &change.value).unwrap_or_else(|| change.value.clone());
        if !field.is_momentary() && !self.sync.accept_intent(&change.id, &requested) {
            tracing::trace!("{} = {} already requested or current", change.id, change.value);
            return;
        }

        tracing::debug!("Request {} = {} -> {:?}", change.id, change.value, commands);
        for command in &commands {
            self.send(&player, command);
        }
    }
}
