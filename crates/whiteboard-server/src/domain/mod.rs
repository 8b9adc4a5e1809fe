//! Domain layer for whiteboard-server.
//!
//! Pure configuration types with no I/O.  Message types and session identity
//! live in `whiteboard-core`, shared with anything else that speaks the
//! protocol.

pub mod config;

pub use config::{InvalidConfig, ServerConfig};
