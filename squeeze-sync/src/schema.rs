//! Published fields and the channel schema declared for each player

use state_store::{ChannelNative, ChannelObject, ChannelSchema, StateObject, ValueType};

use crate::model::PlayerId;

/// Role of a player channel
pub const CHANNEL_ROLE: &str = "media.music";

/// A field published under a player's channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Power,
    State,
    Volume,
    Muting,
    Next,
    Prev,
    Stop,
    Play,
    Pause,
    CurrentTitle,
    CurrentAlbum,
    CurrentArtist,
    CurrentArtwork,
    CurrentDuration,
    CurrentDurationText,
    ElapsedTime,
    ElapsedTimeText,
}

impl Field {
    /// Every field, in declaration order
    pub const ALL: [Field; 17] = [
        Field::Power,
        Field::State,
        Field::Volume,
        Field::Muting,
        Field::Next,
        Field::Prev,
        Field::Stop,
        Field::Play,
        Field::Pause,
        Field::CurrentTitle,
        Field::CurrentAlbum,
        Field::CurrentArtist,
        Field::CurrentArtwork,
        Field::CurrentDuration,
        Field::CurrentDurationText,
        Field::ElapsedTime,
        Field::ElapsedTimeText,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Power => "power",
            Field::State => "state",
            Field::Volume => "volume",
            Field::Muting => "muting",
            Field::Next => "next",
            Field::Prev => "prev",
            Field::Stop => "stop",
            Field::Play => "play",
            Field::Pause => "pause",
            Field::CurrentTitle => "currentTitle",
            Field::CurrentAlbum => "currentAlbum",
            Field::CurrentArtist => "currentArtist",
            Field::CurrentArtwork => "currentArtwork",
            Field::CurrentDuration => "currentDuration",
            Field::CurrentDurationText => "currentDurationText",
            Field::ElapsedTime => "elapsedTime",
            Field::ElapsedTimeText => "elapsedTimeText",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Write-only button fields; each request is a separate press
    pub fn is_momentary(self) -> bool {
        matches!(
            self,
            Field::Next | Field::Prev | Field::Stop | Field::Play | Field::Pause
        )
    }

    /// State object for this field under `channel`
    pub fn state_object(self, channel: &str) -> StateObject {
        let id = state_id(channel, self);
        match self {
            Field::Power | Field::Muting => StateObject::new(id, ValueType::Boolean, "switch").writable(),
            Field::State => StateObject::new(id, ValueType::Number, "switch")
                .writable()
                .with_range(0.0, 2.0),
            Field::Volume => StateObject::new(id, ValueType::Number, "level.volume")
                .writable()
                .with_range(0.0, 100.0),
            Field::Next | Field::Prev | Field::Stop | Field::Play | Field::Pause => {
                StateObject::new(id, ValueType::Boolean, format!("button.{}", self.key()))
                    .write_only()
                    .with_desc(self.key())
            }
            Field::CurrentTitle
            | Field::CurrentAlbum
            | Field::CurrentArtist
            | Field::CurrentDurationText
            | Field::ElapsedTimeText => StateObject::new(id, ValueType::String, "text"),
            Field::CurrentArtwork => StateObject::new(id, ValueType::String, "text.url"),
            Field::CurrentDuration | Field::ElapsedTime => {
                StateObject::new(id, ValueType::Number, "value.interval")
            }
        }
    }
}

/// Full state id of a field: `<channel>.<field>`
pub fn state_id(channel: &str, field: Field) -> String {
    format!("{}.{}", channel, field.key())
}

/// Channel key derived from a display name
///
/// Surrounding whitespace is dropped and every inner whitespace character
/// becomes `_`.
pub fn sanitize_channel_key(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Channel object plus every field's state object
pub fn channel_schema(channel: &str, player: &PlayerId, name: &str) -> ChannelSchema {
    ChannelSchema {
        channel: ChannelObject {
            id: channel.to_string(),
            name: channel.to_string(),
            role: CHANNEL_ROLE.to_string(),
            native: ChannelNative {
                player_id: player.to_string(),
                name: name.to_string(),
            },
        },
        states: Field::ALL.iter().map(|f| f.state_object(channel)).collect(),
    }
}
