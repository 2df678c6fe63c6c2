//! Squeezebox / Lyrion bridge
//!
//! Connects to a media server's CLI port, publishes every named player as
//! a channel in a [`StateStore`], and turns requested state changes back
//! into player commands.
//!
//! # Crates
//!
//! - `state-store`: channels, typed states and change subscriptions
//! - `lms-session`: the CLI connection and its event stream
//! - `squeeze-sync`: the engine mapping one onto the other
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use squeezebridge::{Bridge, BridgeConfig};
//! use state_store::StateValue;
//!
//! let bridge = Bridge::start(BridgeConfig::default().with_server("192.168.1.10")).await?;
//!
//! // Mute the kitchen player
//! bridge.store().set_state("Kitchen.muting", StateValue::Bool(true), false)?;
//! ```

mod bridge;
mod config;
mod error;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};

pub use lms_session::{SessionConfig, SessionError};
pub use squeeze_sync::logging;
pub use squeeze_sync::{EngineConfig, SyncEngine};
pub use state_store::{StateStore, StateValue};
