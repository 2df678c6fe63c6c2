use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use squeezebridge::logging::{init_logging, init_logging_from_env};
use squeezebridge::{Bridge, BridgeConfig};

/// Publish Squeezebox players as states and control them through those states
#[derive(Parser, Debug)]
#[command(name = "squeezebridge")]
#[command(version)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Media server host (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,

    /// Media server CLI port (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Seconds between elapsed-time updates (overrides the config file)
    #[arg(long)]
    elapsed_interval: Option<u64>,

    /// Logging mode: silent, development or debug
    #[arg(long)]
    log_mode: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => BridgeConfig::default(),
        };

        if let Some(server) = self.server {
            config = config.with_server(server);
        }
        if let Some(port) = self.port {
            config = config.with_cli_port(port);
        }
        if let Some(interval) = self.elapsed_interval {
            config = config.with_elapsed_interval(interval);
        }
        if let Some(mode) = self.log_mode {
            config = config.with_log_mode(mode);
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config()?;
    match std::env::var_os("SQUEEZEBRIDGE_LOG_MODE") {
        Some(_) => init_logging_from_env(),
        None => init_logging(config.logging_mode()?),
    }
    .context("Failed to initialize logging")?;

    let mut bridge = Bridge::start(config)
        .await
        .context("Failed to start bridge")?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!("Failed to listen for ctrl-c: {}", e);
            }
        }
        _ = bridge.disconnected() => {
            tracing::warn!("Media server closed the connection");
        }
    }

    bridge.shutdown().await;
    Ok(())
}
