//! Shared whiteboard relay server entry point.
//!
//! Browsers connect over WebSocket, are each assigned a color, and every
//! stroke or clear one browser sends is relayed to all the others.
//!
//! # Usage
//!
//! ```text
//! whiteboard-server [OPTIONS]
//!
//! Options:
//!   --port          <PORT>  Listen port [default: 3000]
//!   --bind          <IP>    Bind address [default: 0.0.0.0]
//!   --config        <PATH>  Optional TOML config file
//!   --ping-interval <SECS>  WebSocket keepalive ping interval [default: 30]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                   | Default   | Description                 |
//! |----------------------------|-----------|-----------------------------|
//! | `PORT`                     | `3000`    | Listen port                 |
//! | `WHITEBOARD_BIND`          | `0.0.0.0` | Bind address                |
//! | `WHITEBOARD_CONFIG`        | (none)    | TOML config file            |
//! | `WHITEBOARD_PING_INTERVAL` | `30`      | Keepalive interval (secs)   |
//!
//! CLI args take precedence over environment variables, which take
//! precedence over the config file.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use whiteboard_server::domain::config::{ServerConfig, DEFAULT_PORT};
use whiteboard_server::infrastructure::{load_config, run_server, FileConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Shared whiteboard relay server.
#[derive(Debug, Parser)]
#[command(
    name = "whiteboard-server",
    about = "WebSocket relay for a shared multi-user whiteboard",
    version
)]
struct Cli {
    /// TCP port to listen on.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// IP address to bind to.  `0.0.0.0` accepts connections on every
    /// interface; `127.0.0.1` only local ones.
    #[arg(long, env = "WHITEBOARD_BIND")]
    bind: Option<String>,

    /// Path to a TOML config file (port, bind address, palette).
    #[arg(long, env = "WHITEBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds between WebSocket keepalive pings to each browser.
    #[arg(long, env = "WHITEBOARD_PING_INTERVAL")]
    ping_interval: Option<u64>,
}

impl Cli {
    /// Merges CLI arguments, the optional config file, and defaults into a
    /// [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, its
    /// palette is invalid, the bind address is not an IP address, or a
    /// queue capacity or the ping interval is zero.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let file = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?,
            None => FileConfig::default(),
        };
        self.merge(file)
    }

    fn merge(self, file: FileConfig) -> anyhow::Result<ServerConfig> {
        let defaults = ServerConfig::default();

        let port = self.port.or(file.server.port).unwrap_or(DEFAULT_PORT);
        let bind_ip: IpAddr = match self.bind.or_else(|| file.server.bind_address.clone()) {
            Some(bind) => bind
                .parse()
                .with_context(|| format!("invalid bind address: '{bind}'"))?,
            None => defaults.bind_addr.ip(),
        };

        let palette = file.palette()?.unwrap_or(defaults.palette);

        let ping_interval = self
            .ping_interval
            .or(file.server.ping_interval_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.ping_interval);

        let config = ServerConfig {
            bind_addr: SocketAddr::new(bind_ip, port),
            palette,
            outbox_capacity: file
                .server
                .outbox_capacity
                .unwrap_or(defaults.outbox_capacity),
            hub_capacity: defaults.hub_capacity,
            ping_interval,
        };
        config.validate()?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Initialise `tracing_subscriber` (level from `RUST_LOG`, default `info`).
/// 2. Parse CLI arguments and build the [`ServerConfig`].
/// 3. Spawn a Ctrl+C handler that clears the shared `running` flag.
/// 4. Run the server until the flag is cleared.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_server_config()?;

    info!(
        "whiteboard server starting: bind={}, palette={} color(s)",
        config.bind_addr,
        config.palette.len()
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, running).await?;

    info!("whiteboard server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
