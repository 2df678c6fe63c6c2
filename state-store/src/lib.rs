//! Keyed State Store
//!
//! An in-process state store where each device is a channel of named,
//! typed states that other parts of the process can observe and control.
//!
//! # Features
//!
//! - **Object Schemas**: Channels and states carry read/write/type/role metadata
//! - **Acknowledged Writes**: Each write is either a confirmation (`ack = true`)
//!   or a request to change the value (`ack = false`)
//! - **Subscriptions**: Register interest with `*`, `prefix.*` or exact ids
//! - **Blocking Iteration**: Consume change notifications via blocking iterators
//!
//! # Quick Start
//!
//! ```rust
//! use state_store::{StateStore, StateValue};
//!
//! let store = StateStore::new();
//! store.subscribe_states("*");
//!
//! // A UI asks for the kitchen player to be muted
//! store.set_state("Kitchen.muting", StateValue::Bool(true), false).unwrap();
//!
//! // The owner of the channel sees the request
//! let change = store.iter().try_recv().unwrap();
//! assert!(!change.ack);
//! assert_eq!(change.value, StateValue::Bool(true));
//! ```
//!
//! # Architecture
//!
//! ```text
//! StateStore
//!     │
//!     ├── objects: channels + state objects (schema)
//!     │
//!     ├── states: HashMap<id, StoredState { value, ack, writes }>
//!     │
//!     ├── subscriptions: Vec<Pattern>
//!     │
//!     └── event_channel: mpsc::channel<StateChange>
//!             │
//!             └── ChangeIterator
//! ```

pub mod error;
pub mod event;
pub mod iter;
pub mod object;
pub mod store;
pub mod value;

pub use error::{Result, StoreError};
pub use event::StateChange;
pub use iter::{ChangeIterator, TimeoutIter, TryIter};
pub use object::{ChannelNative, ChannelObject, ChannelSchema, StateObject, ValueType};
pub use store::{StateStore, StoredState};
pub use value::StateValue;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::event::StateChange;
    pub use crate::iter::ChangeIterator;
    pub use crate::object::{ChannelSchema, StateObject, ValueType};
    pub use crate::store::StateStore;
    pub use crate::value::StateValue;
}
