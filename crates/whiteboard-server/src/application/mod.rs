//! Application layer for whiteboard-server.
//!
//! # Responsibilities
//!
//! - Running the hub task, which owns the [`LifecycleManager`] and applies
//!   connect / message / disconnect commands one at a time.
//! - Adapting per-session tokio channels to the core [`Outbox`] trait.
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or WebSocket framing (that is infrastructure)
//! - Color assignment or relay rules (those live in `whiteboard-core`)
//!
//! [`LifecycleManager`]: whiteboard_core::LifecycleManager
//! [`Outbox`]: whiteboard_core::Outbox

pub mod hub_service;

pub use hub_service::{spawn_hub, ChannelOutbox, HubCommand, HubHandle, HubServiceError};
