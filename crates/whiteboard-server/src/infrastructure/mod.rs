//! Infrastructure layer for whiteboard-server.
//!
//! # Responsibilities
//!
//! - Binding the TCP listener and performing WebSocket upgrades
//! - Running one reader and one writer per browser session
//! - Keeping sessions alive with WebSocket pings
//! - Reading the optional TOML configuration file
//!
//! # What does NOT belong here?
//!
//! - Color assignment and relay rules (`whiteboard-core`)
//! - Serializing access to session state (the hub task in `application`)

pub mod config_file;
pub mod ws_server;

pub use config_file::{load_config, ConfigError, FileConfig};
pub use ws_server::{bind, run_server, serve, serve_with_hub};
