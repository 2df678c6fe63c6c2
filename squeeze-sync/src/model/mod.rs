//! Data model for synchronized players

mod device;
mod play_state;

pub use device::{ChannelState, Device};
pub use play_state::PlayState;

pub use lms_session::PlayerId;
