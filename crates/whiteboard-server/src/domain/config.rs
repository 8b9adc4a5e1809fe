//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! It is built once in `main.rs` from CLI arguments, environment variables,
//! and the optional TOML file, then shared read-only with every task.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use whiteboard_core::ColorPalette;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// A [`ServerConfig`] value the server cannot run with.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidConfig {
    #[error("outbox_capacity must be at least 1")]
    ZeroOutboxCapacity,
    #[error("hub_capacity must be at least 1")]
    ZeroHubCapacity,
    #[error("ping interval must be non-zero")]
    ZeroPingInterval,
}

/// All runtime configuration for the whiteboard server.
///
/// # Example
///
/// ```rust
/// use whiteboard_server::domain::ServerConfig;
///
/// let cfg = ServerConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 3000);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address and port the WebSocket server binds to.
    ///
    /// `0.0.0.0` accepts connections on every interface.
    pub bind_addr: SocketAddr,

    /// Colors handed out to sessions in connection order.
    pub palette: ColorPalette,

    /// Outbound messages that may queue up for one browser before further
    /// events to it are dropped.
    pub outbox_capacity: usize,

    /// Commands that may queue up for the hub task before session readers
    /// wait.
    pub hub_capacity: usize,

    /// How often the server pings each browser.  A failed ping ends the
    /// session.
    pub ping_interval: Duration,
}

impl ServerConfig {
    /// Checks the values that tokio would otherwise panic on: a zero-capacity
    /// `mpsc` channel or a zero-period `interval`.
    ///
    /// # Errors
    ///
    /// Returns the first zero-valued field found.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.outbox_capacity == 0 {
            return Err(InvalidConfig::ZeroOutboxCapacity);
        }
        if self.hub_capacity == 0 {
            return Err(InvalidConfig::ZeroHubCapacity);
        }
        if self.ping_interval.is_zero() {
            return Err(InvalidConfig::ZeroPingInterval);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    /// | Field           | Default          |
    /// |-----------------|------------------|
    /// | bind_addr       | `0.0.0.0:3000`   |
    /// | palette         | six colors       |
    /// | outbox_capacity | 256              |
    /// | hub_capacity    | 1024             |
    /// | ping_interval   | 30 seconds       |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            palette: ColorPalette::default(),
            outbox_capacity: 256,
            hub_capacity: 1024,
            ping_interval: Duration::from_secs(30),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
