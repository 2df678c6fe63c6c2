//! Session handle
//!
//! `LmsSession` is the command side of a connection to the server; the
//! matching `SessionEvents` is the event side. Sends are fire-and-forget:
//! they are queued to the worker, which writes them in order.

use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::codec::player_command;
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::event::{PlayerId, SessionEvent};
use crate::worker::{run_session, Command};

/// Command side of a media server session
///
/// # Example
///
/// ```rust,ignore
/// use lms_session::{LmsSession, SessionConfig, SessionEvent};
///
/// let (session, mut events) = LmsSession::connect(SessionConfig::new("192.168.1.10")).await?;
///
/// while let Some(event) = events.recv().await {
///     if let SessionEvent::Ready(players) = event {
///         for player in players {
///             session.send(&player, "name ?")?;
///         }
///     }
/// }
/// ```
pub struct LmsSession {
    command_tx: mpsc::UnboundedSender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl LmsSession {
    /// Connect to the server's CLI port and start the session worker
    ///
    /// Player discovery starts right away; `SessionEvent::Ready` arrives
    /// once the server has listed its players.
    pub async fn connect(config: SessionConfig) -> Result<(Self, SessionEvents)> {
        config.validate()?;

        let address = config.address();
        tracing::info!("Connecting to media server at {}", address);

        let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect(&address))
            .await
            .map_err(|_| SessionError::ConnectTimeout {
                address: address.clone(),
                timeout: config.connect_timeout,
            })??;
        stream.set_nodelay(true)?;

        let (reader, writer) = stream.into_split();
        Ok(Self::spawn(reader, writer, config))
    }

    /// Run a session over an already established stream
    pub fn spawn<R, W>(reader: R, writer: W, config: SessionConfig) -> (Self, SessionEvents)
    where
        R: tokio::io::AsyncRead + Unpin + Send + 'static,
        W: tokio::io::AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(run_session(reader, writer, config, command_rx, event_tx));

        let session = Self {
            command_tx,
            worker: Mutex::new(Some(worker)),
        };
        (session, SessionEvents { rx: event_rx })
    }

    /// Queue a command for one player
    pub fn send(&self, player: &PlayerId, command: &str) -> Result<()> {
        self.send_line(player_command(player, command))
    }

    /// Queue a server-level command (no player prefix)
    pub fn send_server(&self, command: &str) -> Result<()> {
        self.send_line(command.to_string())
    }

    /// Ask the server for one of its preferences
    ///
    /// The answer arrives as `SessionEvent::ServerPref`.
    pub fn query_pref(&self, name: &str) -> Result<()> {
        self.send_server(&format!("pref {} ?", name))
    }

    /// Whether the worker is still running
    pub fn is_connected(&self) -> bool {
        !self.command_tx.is_closed()
    }

    /// Stop notifications and close the connection
    ///
    /// Makes a single attempt; callers decide how loudly to report failure.
    pub async fn shutdown(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Shutdown(done_tx))
            .map_err(|_| SessionError::ChannelClosed)?;

        let result = done_rx.await.map_err(|_| SessionError::ChannelClosed)?;

        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }

        result
    }

    fn send_line(&self, line: String) -> Result<()> {
        self.command_tx
            .send(Command::Send(line))
            .map_err(|_| SessionError::ChannelClosed)
    }
}

impl std::fmt::Debug for LmsSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LmsSession")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Event side of a media server session
#[derive(Debug)]
pub struct SessionEvents {
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    /// Wait for the next event
    ///
    /// Returns `None` once the worker has stopped and all events are drained.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Take an event if one is queued
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }
}
