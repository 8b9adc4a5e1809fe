//! Event relay: stamp an event with its sender's color and fan it out.
//!
//! The relay keeps no state of its own.  Each call resolves the sender in the
//! registry and hands the event to [`SessionRegistry::send_to_all_except`],
//! so the sender never receives its own event.
//!
//! # Dropped events
//!
//! If the sender is no longer registered (it disconnected while its last
//! event was still in flight) the event is dropped and
//! [`RelayOutcome::Dropped`] is returned.  This is not an error: nothing is
//! propagated to the caller or to the peers.

use tracing::debug;

use crate::domain::event::{DrawEvent, Point};
use crate::domain::session::SessionId;
use crate::protocol::messages::ServerMessage;

use super::outbox::Outbox;
use super::registry::{FanOut, SessionRegistry};

/// What happened to one relayed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The event was fanned out to the sender's peers.
    Relayed(FanOut),
    /// The sender is unknown; nothing was sent.
    Dropped,
}

impl RelayOutcome {
    /// Number of peers that accepted the event.
    pub fn delivered(&self) -> usize {
        match self {
            RelayOutcome::Relayed(fan_out) => fan_out.delivered,
            RelayOutcome::Dropped => 0,
        }
    }
}

/// Relays one stroke segment from `sender` to every other session.
///
/// The outgoing [`DrawEvent`] always carries the sender's registered color.
pub fn relay_draw<O: Outbox>(
    registry: &SessionRegistry<O>,
    sender: &SessionId,
    point: Point,
    brush_size: f64,
) -> RelayOutcome {
    let color = match registry.color_of(sender) {
        Ok(color) => color.clone(),
        Err(e) => {
            debug!("draw dropped: {e}");
            return RelayOutcome::Dropped;
        }
    };

    let message = ServerMessage::Draw(DrawEvent::stamped(point, brush_size, color));
    RelayOutcome::Relayed(registry.send_to_all_except(sender, &message))
}

/// Relays a canvas clear from `sender` to every other session.
pub fn relay_clear<O: Outbox>(registry: &SessionRegistry<O>, sender: &SessionId) -> RelayOutcome {
    if !registry.contains(sender) {
        debug!("clear dropped: unknown session {sender}");
        return RelayOutcome::Dropped;
    }

    RelayOutcome::Relayed(registry.send_to_all_except(sender, &ServerMessage::Clear))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
