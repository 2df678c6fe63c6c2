//! # Media Server Session
//!
//! A control session to a Logitech Media Server over its line-oriented CLI.
//!
//! ## Overview
//!
//! The session owns one TCP connection. A background worker discovers the
//! server's players, enables notifications and turns every inbound line
//! into a typed [`SessionEvent`]. Commands are queued through
//! [`LmsSession`] and written in the order they were sent.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lms_session::{LmsSession, PlayerNotification, SessionConfig, SessionEvent};
//!
//! let (session, mut events) = LmsSession::connect(SessionConfig::new("192.168.1.10")).await?;
//! session.query_pref("httpport")?;
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         SessionEvent::Ready(players) => println!("{} players", players.len()),
//!         SessionEvent::Player { player, notification: PlayerNotification::Line(tokens) } => {
//!             println!("{}: {}", player, tokens.join(" "));
//!         }
//!         SessionEvent::ServerPref { name, value } => println!("{} = {}", name, value),
//!         _ => {}
//!     }
//! }
//!
//! session.shutdown().await?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! LmsSession ──Command──▶ worker task ──line──▶ server
//!                              │
//! SessionEvents ◀──SessionEvent┘◀──line── server
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod session;
pub mod worker;

pub use config::{SessionConfig, DEFAULT_CLI_PORT};
pub use error::{Result, SessionError};
pub use event::{PlayerId, PlayerNotification, SessionEvent};
pub use session::{LmsSession, SessionEvents};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        LmsSession, PlayerId, PlayerNotification, Result, SessionConfig, SessionError, SessionEvent,
        SessionEvents,
    };
}
