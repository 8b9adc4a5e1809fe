//! whiteboard-server library crate.
//!
//! A WebSocket server that lets many browsers draw on one shared canvas.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browsers (JSON over WebSocket)
//!         ↕
//! [whiteboard-server]
//!   ├── domain/           ServerConfig
//!   ├── application/      Hub task: owns the LifecycleManager, one event at a time
//!   └── infrastructure/
//!         ├── ws_server/    WebSocket accept loop and per-session tasks
//!         └── config_file/  Optional TOML config file
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain`, `whiteboard-core`, and tokio channels.
//! - `infrastructure` depends on all other layers plus sockets and the filesystem.

/// Domain layer: configuration types.
pub mod domain;

/// Application layer: the hub task.
pub mod application;

/// Infrastructure layer: WebSocket server and config file loading.
pub mod infrastructure;
