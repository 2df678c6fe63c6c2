//! Player state synchronization
//!
//! Keeps a state store in step with the players of a Squeezebox / Lyrion
//! media server. Each named player becomes a channel of typed states;
//! events from the server update those states, and unacknowledged writes
//! to them are turned back into player commands.
//!
//! # Architecture
//!
//! ```text
//! LmsSession ─ SessionEvent ─┐
//!                            ├─▶ SyncEngine ──▶ StateWriter (acknowledged states)
//! StateStore ─ StateChange ──┤        │
//! ElapsedTicker ─ Tick ──────┘        └──────▶ CommandSink (player commands)
//! ```
//!
//! Every input goes through one channel and is handled by one task, so
//! ticks, mode changes and requests for the same player never interleave.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use squeeze_sync::{EngineConfig, SyncEngine};
//!
//! let (session, mut events) = LmsSession::connect(SessionConfig::new("192.168.1.10")).await?;
//! let session = Arc::new(session);
//! let store = StateStore::new();
//!
//! let (engine, handle) = SyncEngine::new(
//!     EngineConfig::new("192.168.1.10"),
//!     session.clone(),
//!     Arc::new(store.clone()),
//! )?;
//! tokio::spawn(engine.run());
//!
//! while let Some(event) = events.recv().await {
//!     handle.session_event(event)?;
//! }
//! ```

mod artwork;
mod bootstrap;
mod config;
mod decoder;
mod engine;
mod error;
mod format;
mod interpreter;
mod registry;
mod schema;
mod sink;
mod synchronizer;
mod ticker;
mod translator;

pub mod logging;
pub mod model;

pub use artwork::{cache_buster, resolve_artwork, ArtworkResolution, ARTWORK_URL_PREFIX};
pub use bootstrap::HTTP_PORT_PREF;
pub use config::EngineConfig;
pub use decoder::{decode_line, PlayerEvent};
pub use engine::{EngineHandle, EngineInput, SyncEngine};
pub use error::{Result, SyncError};
pub use format::to_formatted_time;
pub use registry::DeviceRegistry;
pub use schema::{channel_schema, sanitize_channel_key, state_id, Field, CHANNEL_ROLE};
pub use sink::{CommandSink, StateWriter};
pub use synchronizer::StateSynchronizer;
pub use ticker::{ElapsedTicker, TickerHandle, TickerId};
pub use translator::translate;

pub use model::{ChannelState, Device, PlayState, PlayerId};
