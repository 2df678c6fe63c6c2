//! CLI line codec
//!
//! The server speaks one command or notification per line. Tokens are
//! separated by single spaces and each token is percent-encoded, so
//! `00%3A04%3A20%3Aaa%3Abb%3Acc artist The%20Beatles` decodes to the
//! player id `00:04:20:aa:bb:cc` and the tokens `["artist", "The Beatles"]`.

use std::collections::HashMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::event::{PlayerId, PlayerNotification};

/// Characters left alone when encoding a token
const TOKEN: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

const PLAYER_ID_TAG: &str = "playerid:";

/// Split a raw line and percent-decode every token
pub fn decode_tokens(line: &str) -> Vec<String> {
    line.trim_end_matches(['\r', '\n'])
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(|t| percent_decode_str(t).decode_utf8_lossy().into_owned())
        .collect()
}

/// Percent-encode a single token
pub fn encode_token(token: &str) -> String {
    utf8_percent_encode(token, TOKEN).to_string()
}

/// Build the outbound line for a player command
///
/// The command itself is passed through as written by the caller.
pub fn player_command(player: &PlayerId, command: &str) -> String {
    format!("{} {}", encode_token(player.as_str()), command)
}

/// Classified inbound line
#[derive(Debug, Clone, PartialEq)]
pub enum InboundLine {
    /// Reply to the `players` discovery query
    Players(Vec<PlayerId>),
    /// Reply to a `pref <name> ?` query
    Pref { name: String, value: String },
    /// Line about a single player
    Player { player: PlayerId, tokens: Vec<String> },
    /// Anything else (login echo, listen ack, server notifications)
    Other(Vec<String>),
}

/// Classify a decoded line
pub fn classify(mut tokens: Vec<String>) -> InboundLine {
    match tokens.first().map(String::as_str) {
        Some("players") => {
            let players = tokens
                .iter()
                .filter_map(|t| t.strip_prefix(PLAYER_ID_TAG))
                .map(PlayerId::new)
                .collect();
            InboundLine::Players(players)
        }
        Some("pref") if tokens.len() >= 3 && tokens[2] != "?" => InboundLine::Pref {
            name: tokens[1].clone(),
            value: tokens[2..].join(" "),
        },
        Some(first) if first.contains(':') => {
            let player = PlayerId::new(tokens.remove(0));
            InboundLine::Player { player, tokens }
        }
        _ => InboundLine::Other(tokens),
    }
}

/// Per-player bookkeeping needed to turn lines into notifications
///
/// The server reports relative volume changes (`mixer volume +5`), so the
/// last absolute value is tracked here.
#[derive(Debug, Default)]
pub struct PlayerTracker {
    volumes: HashMap<PlayerId, u8>,
}

impl PlayerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn volume(&self, player: &PlayerId) -> Option<u8> {
        self.volumes.get(player).copied()
    }

    /// Turn the tokens of a player line into a notification
    ///
    /// Returns `None` for empty lines, query echoes and unparseable values.
    pub fn notification(&mut self, player: &PlayerId, tokens: Vec<String>) -> Option<PlayerNotification> {
        let args: Vec<&str> = tokens.iter().map(String::as_str).collect();
        match args.as_slice() {
            [] => None,
            [_, "?"] | ["mixer", _, "?"] => None,
            ["mixer", "volume", value, ..] => {
                let volume = self.apply_volume(player, value)?;
                Some(PlayerNotification::Volume(volume))
            }
            ["power", value, ..] => Some(PlayerNotification::Power((*value).to_string())),
            ["signalstrength", value, ..] => {
                let strength = value.parse::<f64>().ok()?.clamp(0.0, 100.0) as u8;
                Some(PlayerNotification::SignalStrength(strength))
            }
            _ => Some(PlayerNotification::Line(tokens)),
        }
    }

    /// A relative step is dropped until an absolute value has been seen
    fn apply_volume(&mut self, player: &PlayerId, value: &str) -> Option<u8> {
        let parsed = value.parse::<f64>().ok()?.round() as i64;

        let next = if value.starts_with('+') || value.starts_with('-') {
            i64::from(self.volume(player)?) + parsed
        } else {
            parsed
        };

        let volume = next.clamp(0, 100) as u8;
        self.volumes.insert(player.clone(), volume);
        Some(volume)
    }
}
