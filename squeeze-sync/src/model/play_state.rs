//! Play state enumeration

use state_store::StateValue;

/// Play state as published under the `state` field
///
/// The numeric values are part of the published contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayState {
    Paused = 0,
    Playing = 1,
    Stopped = 2,
}

impl PlayState {
    /// Map the argument of a `mode` line
    ///
    /// Anything other than `play` or `pause` counts as stopped.
    pub fn from_mode(mode: &str) -> Self {
        match mode {
            "play" => PlayState::Playing,
            "pause" => PlayState::Paused,
            _ => PlayState::Stopped,
        }
    }

    pub fn value(self) -> i64 {
        self as i64
    }

    pub fn is_playing(self) -> bool {
        self == PlayState::Playing
    }
}

impl Default for PlayState {
    fn default() -> Self {
        PlayState::Stopped
    }
}

impl From<PlayState> for StateValue {
    fn from(state: PlayState) -> Self {
        StateValue::Number(state.value())
    }
}
