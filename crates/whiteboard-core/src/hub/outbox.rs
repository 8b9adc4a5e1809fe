//! Per-session outbound delivery.

use thiserror::Error;

use crate::protocol::messages::ServerMessage;

/// Why a message could not be handed to a session's transport.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The session's transport has gone away (peer mid-disconnect).
    #[error("outbound channel closed")]
    Closed,

    /// The session is not draining its queue fast enough.
    #[error("outbound queue full")]
    Full,
}

/// The sending side of one session's connection.
///
/// `deliver` must not block or await: the hub calls it once per peer during a
/// fan-out, and one slow peer must not stall the others.  Implementations
/// enqueue the message and return immediately.
#[cfg_attr(test, mockall::automock)]
pub trait Outbox {
    fn deliver(&self, message: &ServerMessage) -> Result<(), DeliveryError>;
}

impl<T: Outbox + ?Sized> Outbox for Box<T> {
    fn deliver(&self, message: &ServerMessage) -> Result<(), DeliveryError> {
        (**self).deliver(message)
    }
}
