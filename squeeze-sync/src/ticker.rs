//! Elapsed-time tickers
//!
//! A ticker is a small task that sends `EngineInput::Tick` to the engine
//! once per interval while a player is playing. Ticks are applied by the
//! engine itself, so they are serialized with every other state change.
//! Cancelling a handle stops the task at its next await point; a tick that
//! was already queued is discarded by the engine because the ticker id no
//! longer matches the device.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::engine::EngineInput;
use crate::model::PlayerId;

/// Identifies one ticker instance
pub type TickerId = u64;

/// Owner of a running ticker; cancels it when dropped
#[derive(Debug)]
pub struct TickerHandle {
    id: TickerId,
    token: CancellationToken,
}

impl TickerHandle {
    pub fn id(&self) -> TickerId {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Factory for per-player elapsed-time tickers
#[derive(Debug)]
pub struct ElapsedTicker {
    interval: Duration,
    next_id: TickerId,
    tx: mpsc::UnboundedSender<EngineInput>,
}

impl ElapsedTicker {
    pub fn new(interval: Duration, tx: mpsc::UnboundedSender<EngineInput>) -> Self {
        Self {
            interval,
            next_id: 1,
            tx,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whole seconds added to the elapsed time on each tick
    pub fn interval_secs(&self) -> i64 {
        self.interval.as_secs() as i64
    }

    /// Start a ticker for `player`
    ///
    /// The first tick fires one full interval from now. Without a tokio
    /// runtime the returned handle is inert.
    pub fn start(&mut self, player: PlayerId) -> TickerHandle {
        let id = self.next_id;
        self.next_id += 1;

        let token = CancellationToken::new();
        let handle = TickerHandle {
            id,
            token: token.clone(),
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("No runtime available, ticker for {} not started", player);
                return handle;
            }
        };

        let period = self.interval;
        let tx = self.tx.clone();
        tracing::debug!("Starting ticker {} for {}", id, player);

        runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let tick = EngineInput::Tick {
                            player: player.clone(),
                            ticker: id,
                        };
                        if tx.send(tick).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!("Ticker {} for {} stopped", id, player);
        });

        handle
    }
}
