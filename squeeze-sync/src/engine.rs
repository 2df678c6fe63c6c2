//! The synchronization engine
//!
//! `SyncEngine` owns the device registry, the published-value cache and the
//! ticker factory. All inputs (session events, state change requests and
//! ticker ticks) arrive on one channel and are handled one at a time by
//! `run`, so no two of them ever interleave.

use std::ops::ControlFlow;
use std::sync::Arc;

use lms_session::SessionEvent;
use state_store::{StateChange, StateValue};
use tokio::sync::mpsc;

use crate::config::EngineConfig;
use crate::error::{Result, SyncError};
use crate::model::PlayerId;
use crate::registry::DeviceRegistry;
use crate::schema::{state_id, Field};
use crate::sink::{CommandSink, StateWriter};
use crate::synchronizer::StateSynchronizer;
use crate::ticker::{ElapsedTicker, TickerId};

/// Input consumed by the engine loop
#[derive(Debug)]
pub enum EngineInput {
    /// Event from the media server session
    Session(SessionEvent),
    /// Write observed on the state store
    StateChange(StateChange),
    /// Elapsed-time tick from a player's ticker
    Tick { player: PlayerId, ticker: TickerId },
    /// Stop all tickers and end the loop
    Shutdown,
}

pub struct SyncEngine {
    pub(crate) config: EngineConfig,
    pub(crate) registry: DeviceRegistry,
    pub(crate) sync: StateSynchronizer,
    pub(crate) commands: Arc<dyn CommandSink>,
    pub(crate) tickers: ElapsedTicker,
    pub(crate) http_port: Option<u16>,
    pub(crate) httpport_requested: bool,
    input_rx: mpsc::UnboundedReceiver<EngineInput>,
}

impl SyncEngine {
    /// Create an engine and the handle that feeds it
    pub fn new(
        config: EngineConfig,
        commands: Arc<dyn CommandSink>,
        writer: Arc<dyn StateWriter>,
    ) -> Result<(Self, EngineHandle)> {
        config.validate()?;

        let (tx, input_rx) = mpsc::unbounded_channel();
        let engine = Self {
            tickers: ElapsedTicker::new(config.elapsed_interval, tx.clone()),
            config,
            registry: DeviceRegistry::new(),
            sync: StateSynchronizer::new(writer),
            commands,
            http_port: None,
            httpport_requested: false,
            input_rx,
        };

        Ok((engine, EngineHandle { tx }))
    }

    /// Process inputs until `Shutdown` arrives
    pub async fn run(mut self) {
        tracing::info!("Sync engine started");

        while let Some(input) = self.input_rx.recv().await {
            if self.handle(input).is_break() {
                break;
            }
        }

        self.registry.cancel_all_tickers();
        tracing::info!("Sync engine stopped");
    }

    /// Handle every input that is already queued, without waiting
    ///
    /// Returns the number of inputs handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(input) = self.input_rx.try_recv() {
            handled += 1;
            if self.handle(input).is_break() {
                break;
            }
        }
        handled
    }

    /// Apply a single input
    pub fn handle(&mut self, input: EngineInput) -> ControlFlow<()> {
        match input {
            EngineInput::Session(event) => self.handle_session_event(event),
            EngineInput::StateChange(change) => self.handle_state_change(change),
            EngineInput::Tick { player, ticker } => self.handle_tick(&player, ticker),
            EngineInput::Shutdown => {
                let stopped = self.registry.cancel_all_tickers();
                tracing::debug!("Shutdown requested, stopped {} tickers", stopped);
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Ready(players) => self.on_ready(players),
            SessionEvent::Player {
                player,
                notification,
            } => self.handle_notification(player, notification),
            SessionEvent::ServerPref { name, value } => self.on_server_pref(&name, &value),
            SessionEvent::Disconnected => {
                let stopped = self.registry.cancel_all_tickers();
                tracing::info!("Session disconnected, stopped {} tickers", stopped);
            }
        }
    }

    /// Advance a player's elapsed time by one interval
    ///
    /// Ticks from a ticker that has since been cancelled or replaced are
    /// discarded.
    fn handle_tick(&mut self, player: &PlayerId, ticker: TickerId) {
        let step = self.tickers.interval_secs();
        let Some(device) = self.registry.get_mut(player) else {
            return;
        };

        let current = device
            .ticker
            .as_ref()
            .is_some_and(|handle| handle.id() == ticker && !handle.is_cancelled());
        if !current {
            tracing::trace!("Discarding stale tick {} for {}", ticker, player);
            return;
        }
        let Some(channel) = device.channel_key().map(str::to_string) else {
            return;
        };

        device.elapsed_secs += step;
        let elapsed = device.elapsed_secs;
        self.publish_elapsed(&channel, elapsed);
    }

    pub(crate) fn publish(&mut self, channel: &str, field: Field, value: impl Into<StateValue>) -> bool {
        self.sync.publish(&state_id(channel, field), value.into())
    }

    pub(crate) fn publish_elapsed(&mut self, channel: &str, elapsed: i64) {
        self.publish(channel, Field::ElapsedTime, elapsed);
        self.publish(channel, Field::ElapsedTimeText, crate::format::to_formatted_time(elapsed));
    }

    pub(crate) fn send(&self, player: &PlayerId, command: &str) {
        tracing::trace!("{} <- {}", player, command);
        self.commands.send_command(player, command);
    }

    /// Channel key of a published player
    pub(crate) fn channel_of(&self, player: &PlayerId) -> Option<String> {
        self.registry
            .get(player)
            .and_then(|device| device.channel_key())
            .map(str::to_string)
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn http_port(&self) -> Option<u16> {
        self.http_port
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("config", &self.config)
            .field("players", &self.registry.len())
            .field("http_port", &self.http_port)
            .finish()
    }
}

/// Cloneable sender feeding a `SyncEngine`
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineInput>,
}

impl EngineHandle {
    pub fn session_event(&self, event: SessionEvent) -> Result<()> {
        self.send(EngineInput::Session(event))
    }

    pub fn state_change(&self, change: StateChange) -> Result<()> {
        self.send(EngineInput::StateChange(change))
    }

    /// Ask the engine to stop; its tickers are cancelled before `run` returns
    pub fn shutdown(&self) -> Result<()> {
        self.send(EngineInput::Shutdown)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, input: EngineInput) -> Result<()> {
        self.tx.send(input).map_err(|_| SyncError::EngineStopped)
    }
}
