//! Parsing of player event lines into a closed set of event kinds
//!
//! Dispatch is on the first token (and the second for `mixer`). Anything
//! that does not match a known shape is `Unrecognized` and ignored by the
//! interpreter.

use crate::model::PlayState;

/// One decoded player event line
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// `playlist <sub> ...`; `new_song` is set for `playlist newsong`
    Playlist { new_song: bool },
    Artist(String),
    Album(String),
    Muting(bool),
    /// Track length in seconds
    Duration(f64),
    /// Playback position in seconds
    Time(f64),
    /// `status ...` reply, tokens kept for artwork resolution
    Status(Vec<String>),
    Mode(PlayState),
    Name(String),
    CurrentTitle(String),
    Unrecognized,
}

/// Decode the tokens following the player id
pub fn decode_line(tokens: &[String]) -> PlayerEvent {
    let Some((head, rest)) = tokens.split_first() else {
        return PlayerEvent::Unrecognized;
    };

    match head.as_str() {
        "playlist" => PlayerEvent::Playlist {
            new_song: rest.first().map(String::as_str) == Some("newsong"),
        },
        "artist" => PlayerEvent::Artist(rest.join(" ")),
        "album" => PlayerEvent::Album(rest.join(" ")),
        "mixer" => match rest {
            [sub, flag @ ..] if sub == "muting" => {
                PlayerEvent::Muting(flag.first().map(String::as_str) == Some("1"))
            }
            _ => PlayerEvent::Unrecognized,
        },
        "duration" => parse_seconds(rest).map_or(PlayerEvent::Unrecognized, PlayerEvent::Duration),
        "time" => parse_seconds(rest).map_or(PlayerEvent::Unrecognized, PlayerEvent::Time),
        "status" => PlayerEvent::Status(tokens.to_vec()),
        "mode" => match rest.first() {
            Some(mode) => PlayerEvent::Mode(PlayState::from_mode(mode)),
            None => PlayerEvent::Unrecognized,
        },
        "name" => {
            let name = rest.join(" ");
            if name.trim().is_empty() {
                PlayerEvent::Unrecognized
            } else {
                PlayerEvent::Name(name)
            }
        }
        "current_title" => PlayerEvent::CurrentTitle(rest.join(" ")),
        _ => PlayerEvent::Unrecognized,
    }
}

fn parse_seconds(rest: &[String]) -> Option<f64> {
    rest.first()?
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
