//! SessionRegistry: the set of live sessions and the colors they were given.
//!
//! The registry is the only shared mutable state in the relay.  It owns:
//!
//! - the map of live sessions, each paired with its [`Outbox`], and
//! - the connection counter that drives color assignment.
//!
//! # Color assignment policy
//!
//! The counter is **monotonic**: it is incremented on every [`register`] and
//! never decremented on disconnect.  The k-th connection ever made (counting
//! from zero) receives `palette[k mod palette.len()]`, no matter how many
//! earlier sessions have since left.  Two simultaneous sessions share a color
//! only once more than `palette.len()` connections have been made.
//!
//! ```text
//! connect A → palette[0]
//! connect B → palette[1]
//! A leaves
//! connect D → palette[2]      (A's slot is not handed back)
//! ```
//!
//! [`register`]: SessionRegistry::register

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::domain::color::{Color, ColorPalette};
use crate::domain::session::{Session, SessionId};
use crate::protocol::messages::ServerMessage;

use super::outbox::{DeliveryError, Outbox};

/// Errors raised by registry lookups and targeted sends.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    /// The session is not (or no longer) registered.
    ///
    /// Usually a benign race: the sender disconnected while its last event was
    /// still queued.
    #[error("unknown session {0}")]
    UnknownSession(SessionId),

    /// The session is registered but its transport refused the message.
    #[error("delivery to session {session} failed: {source}")]
    Delivery {
        session: SessionId,
        #[source]
        source: DeliveryError,
    },
}

/// Result of one fan-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    /// Peers whose outbox accepted the message.
    pub delivered: usize,
    /// Peers whose outbox refused it (closed or full).
    pub failed: usize,
}

/// A registered session together with its delivery handle.
struct Entry<O> {
    session: Session,
    outbox: O,
}

/// Live sessions, keyed by id.
pub struct SessionRegistry<O> {
    palette: ColorPalette,
    connections_total: u64,
    sessions: HashMap<SessionId, Entry<O>>,
}

impl<O: Outbox> SessionRegistry<O> {
    pub fn new(palette: ColorPalette) -> Self {
        Self {
            palette,
            connections_total: 0,
            sessions: HashMap::new(),
        }
    }

    /// Allocates a new session and assigns it the next palette color.
    ///
    /// Never fails: once the counter passes the palette length, colors are
    /// reused cyclically.
    pub fn register(&mut self, outbox: O) -> Session {
        let color = self.palette.color_for(self.connections_total).clone();
        self.connections_total = self.connections_total.wrapping_add(1);

        let session = Session::new(SessionId::new(), color);
        debug!(
            "registered session {} with color {} ({} live)",
            session.id(),
            session.color(),
            self.sessions.len() + 1
        );

        self.sessions.insert(
            session.id(),
            Entry {
                session: session.clone(),
                outbox,
            },
        );
        session
    }

    /// Removes a session.
    ///
    /// Returns the removed session, or `None` if it was already gone.  Calling
    /// this twice for the same id is harmless.
    pub fn unregister(&mut self, id: &SessionId) -> Option<Session> {
        let removed = self.sessions.remove(id).map(|entry| entry.session);
        if removed.is_some() {
            debug!("unregistered session {id} ({} live)", self.sessions.len());
        }
        removed
    }

    /// Returns the color assigned to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::UnknownSession`] if `id` is not registered.
    pub fn color_of(&self, id: &SessionId) -> Result<&Color, HubError> {
        self.sessions
            .get(id)
            .map(|entry| entry.session.color())
            .ok_or(HubError::UnknownSession(*id))
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id).map(|entry| &entry.session)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Total number of sessions ever registered.
    pub fn connections_total(&self) -> u64 {
        self.connections_total
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Iterates over live sessions in no particular order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values().map(|entry| &entry.session)
    }

    /// Delivers `message` to exactly one session.
    ///
    /// # Errors
    ///
    /// - [`HubError::UnknownSession`] if `id` is not registered.
    /// - [`HubError::Delivery`] if its outbox refused the message.
    pub fn send_to(&self, id: &SessionId, message: &ServerMessage) -> Result<(), HubError> {
        let entry = self
            .sessions
            .get(id)
            .ok_or(HubError::UnknownSession(*id))?;
        entry
            .outbox
            .deliver(message)
            .map_err(|source| HubError::Delivery {
                session: *id,
                source,
            })
    }

    /// Delivers `message` to every live session except `origin`.
    ///
    /// A failure on one peer is logged and counted, and delivery continues
    /// with the remaining peers.
    pub fn send_to_all_except(&self, origin: &SessionId, message: &ServerMessage) -> FanOut {
        let mut outcome = FanOut::default();

        for (id, entry) in self.sessions.iter().filter(|(id, _)| *id != origin) {
            match entry.outbox.deliver(message) {
                Ok(()) => outcome.delivered += 1,
                Err(e) => {
                    debug!(
                        "session {id}: dropped {} from {origin}: {e}",
                        message.type_name()
                    );
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
