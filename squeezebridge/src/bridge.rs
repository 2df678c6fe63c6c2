//! Running bridge: session, engine and store wired together

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lms_session::{LmsSession, SessionEvent, SessionEvents};
use squeeze_sync::{EngineHandle, SyncEngine};
use state_store::StateStore;
use tokio::task::JoinHandle;

use crate::config::BridgeConfig;
use crate::error::Result;

/// How often the store forwarder checks whether it should stop
const STORE_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A connected bridge
///
/// # Example
///
/// ```rust,ignore
/// use squeezebridge::{Bridge, BridgeConfig};
///
/// let mut bridge = Bridge::start(BridgeConfig::default().with_server("192.168.1.10")).await?;
///
/// tokio::select! {
///     _ = tokio::signal::ctrl_c() => {}
///     _ = bridge.disconnected() => {}
/// }
/// bridge.shutdown().await;
/// ```
pub struct Bridge {
    store: StateStore,
    session: Arc<LmsSession>,
    engine: EngineHandle,
    engine_task: Option<JoinHandle<()>>,
    session_forwarder: Option<JoinHandle<()>>,
    store_forwarder: Option<thread::JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl Bridge {
    /// Connect to the server and start synchronizing into a new store
    pub async fn start(config: BridgeConfig) -> Result<Self> {
        Self::start_with_store(config, StateStore::new()).await
    }

    /// Connect to the server and start synchronizing into `store`
    pub async fn start_with_store(config: BridgeConfig, store: StateStore) -> Result<Self> {
        config.validate()?;

        let (session, events) = LmsSession::connect(config.session_config()).await?;
        let session = Arc::new(session);

        let (engine, handle) = SyncEngine::new(
            config.engine_config(),
            session.clone(),
            Arc::new(store.clone()),
        )?;
        let engine_task = tokio::spawn(engine.run());

        store.subscribe_states("*");
        let stop = Arc::new(AtomicBool::new(false));
        let store_forwarder = spawn_store_forwarder(store.clone(), handle.clone(), stop.clone());
        let session_forwarder = tokio::spawn(forward_session_events(events, handle.clone()));

        tracing::info!("Bridge started for {}", config.session_config().address());

        Ok(Self {
            store,
            session,
            engine: handle,
            engine_task: Some(engine_task),
            session_forwarder: Some(session_forwarder),
            store_forwarder: Some(store_forwarder),
            stop,
        })
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    /// Resolves once the server connection is gone
    pub async fn disconnected(&mut self) {
        if let Some(forwarder) = self.session_forwarder.as_mut() {
            let _ = forwarder.await;
            self.session_forwarder = None;
        } else {
            std::future::pending::<()>().await;
        }
    }

    /// Stop the engine and close the session
    ///
    /// Always completes; a failed session teardown is logged and swallowed.
    pub async fn shutdown(mut self) {
        tracing::info!("Shutting down bridge");

        if self.engine.shutdown().is_ok() {
            if let Some(task) = self.engine_task.take() {
                let _ = task.await;
            }
        }

        if let Err(e) = self.session.shutdown().await {
            tracing::warn!("Session teardown failed: {}", e);
        }

        if let Some(forwarder) = self.session_forwarder.take() {
            forwarder.abort();
        }

        self.stop.store(true, Ordering::Relaxed);
        if let Some(forwarder) = self.store_forwarder.take() {
            let _ = tokio::task::spawn_blocking(move || forwarder.join()).await;
        }

        tracing::info!("Bridge stopped");
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("session", &self.session)
            .field("store", &self.store)
            .finish()
    }
}

async fn forward_session_events(mut events: SessionEvents, engine: EngineHandle) {
    while let Some(event) = events.recv().await {
        let disconnected = event == SessionEvent::Disconnected;
        if engine.session_event(event).is_err() || disconnected {
            break;
        }
    }
    tracing::debug!("Session event forwarder stopped");
}

/// Forward unacknowledged store writes to the engine
fn spawn_store_forwarder(store: StateStore, engine: EngineHandle, stop: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let changes = store.iter();
        while !stop.load(Ordering::Relaxed) {
            let Some(change) = changes.recv_timeout(STORE_POLL_INTERVAL) else {
                continue;
            };
            if change.ack {
                continue;
            }
            if engine.state_change(change).is_err() {
                break;
            }
        }
        tracing::debug!("Store forwarder stopped");
    })
}
