//! Synchronized player entity

use lms_session::PlayerId;

use crate::ticker::TickerHandle;

/// Publishing status of a device's channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelState {
    /// Display name not known yet
    Pending,
    /// Channel key assigned; states are published under it
    Assigned(String),
    /// Channel key collided with another device; never published
    Excluded,
}

/// One managed playback endpoint
///
/// Created when the session first reports the player's address. The
/// display name and channel key are set once, from the first `name` event.
#[derive(Debug)]
pub struct Device {
    pub(crate) id: PlayerId,
    pub(crate) display_name: Option<String>,
    pub(crate) channel: ChannelState,
    pub(crate) duration_secs: i64,
    pub(crate) elapsed_secs: i64,
    pub(crate) ticker: Option<TickerHandle>,
    pub(crate) awaiting_artwork: bool,
}

impl Device {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            display_name: None,
            channel: ChannelState::Pending,
            duration_secs: 0,
            elapsed_secs: 0,
            ticker: None,
            awaiting_artwork: true,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn channel(&self) -> &ChannelState {
        &self.channel
    }

    /// Channel key, if states may be published for this device
    pub fn channel_key(&self) -> Option<&str> {
        match &self.channel {
            ChannelState::Assigned(key) => Some(key),
            _ => None,
        }
    }

    pub fn is_excluded(&self) -> bool {
        self.channel == ChannelState::Excluded
    }

    pub fn duration_secs(&self) -> i64 {
        self.duration_secs
    }

    pub fn elapsed_secs(&self) -> i64 {
        self.elapsed_secs
    }

    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn awaiting_artwork(&self) -> bool {
        self.awaiting_artwork
    }

    /// Stop and release the elapsed-time ticker, if any
    ///
    /// Returns whether a ticker was running.
    pub(crate) fn cancel_ticker(&mut self) -> bool {
        match self.ticker.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}
