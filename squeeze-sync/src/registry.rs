//! Player registry
//!
//! Holds every `Device` the session has reported and the set of channel
//! keys already claimed. Channel keys are unique: a device whose name
//! sanitizes to a key another device owns is excluded from publishing.

use std::collections::{HashMap, HashSet};

use crate::model::{ChannelState, Device, PlayerId};

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<PlayerId, Device>,
    claimed: HashSet<String>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the device for `id`
    pub fn register(&mut self, id: &PlayerId) -> &mut Device {
        self.devices.entry(id.clone()).or_insert_with(|| {
            tracing::debug!("Registered player {}", id);
            Device::new(id.clone())
        })
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Device> {
        self.devices.get_mut(id)
    }

    /// Device published under `channel`
    pub fn find(&self, channel: &str) -> Option<&Device> {
        self.devices
            .values()
            .find(|device| device.channel_key() == Some(channel))
    }

    /// Every device, ordered by player id
    pub fn all(&self) -> Vec<&Device> {
        let mut devices: Vec<&Device> = self.devices.values().collect();
        devices.sort_by(|a, b| a.id().cmp(b.id()));
        devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Fix the device's display name and channel key
    ///
    /// Only the first call per device has any effect. Returns the assigned
    /// channel key, or `None` when the device was already named or the key
    /// is taken by another device.
    pub fn assign_channel(&mut self, id: &PlayerId, name: &str, key: String) -> Option<String> {
        let device = self.devices.get_mut(id)?;
        if device.display_name.is_some() {
            return None;
        }
        device.display_name = Some(name.to_string());

        if self.claimed.contains(&key) {
            tracing::warn!(
                "Player {} ({:?}) maps to channel {} which is already in use; not publishing it",
                id,
                name,
                key
            );
            device.channel = ChannelState::Excluded;
            return None;
        }

        self.claimed.insert(key.clone());
        device.channel = ChannelState::Assigned(key.clone());
        Some(key)
    }

    /// Stop every running ticker
    pub fn cancel_all_tickers(&mut self) -> usize {
        self.devices
            .values_mut()
            .filter_map(|device| device.cancel_ticker().then_some(()))
            .count()
    }
}
