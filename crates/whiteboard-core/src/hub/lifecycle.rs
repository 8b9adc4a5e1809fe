//! LifecycleManager: connect, dispatch, and disconnect for every session.
//!
//! # Connection lifecycle
//!
//! ```text
//! Connecting  ──►  Connected  ──►  Disconnected
//! ```
//!
//! - `Connecting`: the transport is completing its handshake.  No session
//!   exists yet; the transport layer tracks this state on its own.
//! - `Connected`: [`LifecycleManager::on_connect`] registered the session and
//!   pushed `setColor` to that client only.
//! - `Disconnected`: [`LifecycleManager::on_disconnect`] removed the entry.
//!   Terminal: a browser that reconnects gets a new session and a new color.
//!
//! Disconnecting broadcasts nothing; peers simply stop receiving events from
//! that sender.

use tracing::{debug, info, warn};

use crate::domain::color::ColorPalette;
use crate::domain::event::Point;
use crate::domain::session::{Session, SessionId};
use crate::protocol::messages::{ClientMessage, ServerMessage};

use super::outbox::Outbox;
use super::registry::SessionRegistry;
use super::relay::{relay_clear, relay_draw, RelayOutcome};

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport handshake in progress; not yet registered.
    Connecting,
    /// Registered and holding a color.
    Connected,
    /// Removed from the registry.  Terminal.
    Disconnected,
}

/// Point-in-time counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubStats {
    /// Sessions currently registered.
    pub live_sessions: usize,
    /// Sessions ever registered since start-up.
    pub connections_total: u64,
}

/// Owns the registry and drives it from transport events.
pub struct LifecycleManager<O> {
    registry: SessionRegistry<O>,
}

impl<O: Outbox> LifecycleManager<O> {
    pub fn new(palette: ColorPalette) -> Self {
        Self {
            registry: SessionRegistry::new(palette),
        }
    }

    /// Registers a new connection and tells it its color.
    ///
    /// The `setColor` message goes to the new client only.  If that push
    /// fails the session stays registered; the transport will report the
    /// disconnect shortly.
    pub fn on_connect(&mut self, outbox: O) -> Session {
        let session = self.registry.register(outbox);

        let set_color = ServerMessage::SetColor {
            color: session.color().clone(),
        };
        if let Err(e) = self.registry.send_to(&session.id(), &set_color) {
            warn!("session {}: could not push color: {e}", session.id());
        }

        info!(
            "session {} connected with color {} ({} live)",
            session.id(),
            session.color(),
            self.registry.len()
        );
        session
    }

    /// Dispatches one message received from `sender`.
    pub fn on_message(&mut self, sender: &SessionId, message: ClientMessage) -> RelayOutcome {
        debug!("session {sender}: {}", message.type_name());
        match message {
            ClientMessage::Draw { x, y, brush_size } => {
                relay_draw(&self.registry, sender, Point::new(x, y), brush_size)
            }
            ClientMessage::Clear => relay_clear(&self.registry, sender),
        }
    }

    /// Removes a session.  Calling it twice is harmless.
    pub fn on_disconnect(&mut self, id: &SessionId) -> Option<Session> {
        let removed = self.registry.unregister(id);
        match &removed {
            Some(session) => info!(
                "session {} disconnected ({} live)",
                session.id(),
                self.registry.len()
            ),
            None => debug!("session {id}: disconnect for unknown session ignored"),
        }
        removed
    }

    /// Lifecycle state of a session id handed out by [`on_connect`].
    ///
    /// Ids are only created on connect, so an id that is not registered has
    /// already disconnected.
    ///
    /// [`on_connect`]: LifecycleManager::on_connect
    pub fn state_of(&self, id: &SessionId) -> ConnectionState {
        if self.registry.contains(id) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn stats(&self) -> HubStats {
        HubStats {
            live_sessions: self.registry.len(),
            connections_total: self.registry.connections_total(),
        }
    }

    pub fn registry(&self) -> &SessionRegistry<O> {
        &self.registry
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
