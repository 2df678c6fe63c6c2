//! Background worker owning the server connection
//!
//! The worker reads lines from the socket, turns them into `SessionEvent`s
//! and writes queued commands in the order they were sent.

use std::collections::HashSet;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use crate::codec::{classify, decode_tokens, encode_token, InboundLine, PlayerTracker};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::event::{PlayerId, SessionEvent};

/// Commands sent from `LmsSession` to the worker
#[derive(Debug)]
pub enum Command {
    /// Write a raw line
    Send(String),
    /// Stop listening, close the socket and report the outcome
    Shutdown(oneshot::Sender<Result<()>>),
}

/// Main loop of the session worker
pub(crate) async fn run_session<R, W>(
    reader: R,
    mut writer: W,
    config: SessionConfig,
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut tracker = PlayerTracker::new();
    let mut known: HashSet<PlayerId> = HashSet::new();
    let mut ready = false;

    let mut greeting = Vec::new();
    if let (Some(user), Some(password)) = (&config.username, &config.password) {
        greeting.push(format!("login {} {}", encode_token(user), encode_token(password)));
    }
    greeting.push(format!("players 0 {}", config.max_players));

    for line in greeting {
        if let Err(e) = write_line(&mut writer, &line).await {
            tracing::warn!("Failed to greet server: {}", e);
            let _ = event_tx.send(SessionEvent::Disconnected);
            return;
        }
    }

    tracing::info!("Session worker started");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        tracing::info!("Server closed the connection");
                        let _ = event_tx.send(SessionEvent::Disconnected);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read from server: {}", e);
                        let _ = event_tx.send(SessionEvent::Disconnected);
                        break;
                    }
                };

                tracing::trace!("<- {}", line);
                let event = match classify(decode_tokens(&line)) {
                    InboundLine::Players(players) => {
                        known.extend(players.iter().cloned());
                        if ready {
                            tracing::debug!("Ignoring repeated players reply");
                            None
                        } else {
                            ready = true;
                            if let Err(e) = write_line(&mut writer, "listen 1").await {
                                tracing::warn!("Failed to enable notifications: {}", e);
                            }
                            Some(SessionEvent::Ready(players))
                        }
                    }
                    InboundLine::Pref { name, value } => Some(SessionEvent::ServerPref { name, value }),
                    InboundLine::Player { player, tokens } => {
                        if !known.contains(&player) {
                            tracing::debug!("Line for unannounced player {}", player);
                        }
                        tracker
                            .notification(&player, tokens)
                            .map(|notification| SessionEvent::Player { player, notification })
                    }
                    InboundLine::Other(tokens) => {
                        tracing::trace!("Unhandled server line: {:?}", tokens);
                        None
                    }
                };

                if let Some(event) = event {
                    if event_tx.send(event).is_err() {
                        tracing::debug!("Event receiver dropped, shutting down worker");
                        break;
                    }
                }
            }

            command = command_rx.recv() => {
                match command {
                    Some(Command::Send(line)) => {
                        tracing::trace!("-> {}", line);
                        if let Err(e) = write_line(&mut writer, &line).await {
                            tracing::warn!("Failed to send {:?}: {}", line, e);
                            let _ = event_tx.send(SessionEvent::Disconnected);
                            break;
                        }
                    }
                    Some(Command::Shutdown(done)) => {
                        tracing::info!("Worker received shutdown command");
                        let _ = done.send(close(&mut writer).await);
                        return;
                    }
                    None => {
                        tracing::debug!("Session handle dropped, shutting down worker");
                        let _ = close(&mut writer).await;
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("Session worker stopped");
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

async fn close<W: AsyncWrite + Unpin>(writer: &mut W) -> Result<()> {
    write_line(writer, "listen 0").await?;
    writer.shutdown().await?;
    Ok(())
}
