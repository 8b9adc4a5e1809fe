//! The hub task: a single owner for all session state.
//!
//! Every transport event (a browser connecting, a frame arriving, a socket
//! closing) is turned into a [`HubCommand`] and sent over one `mpsc` channel
//! to the hub task.  The hub applies commands strictly one at a time, so the
//! registry needs no lock: mutual exclusion comes from there being exactly
//! one task that can touch it.
//!
//! ```text
//! session task A ──┐
//! session task B ──┼── mpsc<HubCommand> ──► hub task ──► LifecycleManager
//! session task C ──┘                                          │
//!                                                             ▼
//!                          per-session mpsc<ServerMessage> (ChannelOutbox)
//! ```
//!
//! # Ordering
//!
//! One session task sends its commands in the order its browser produced
//! them, and the channel is FIFO, so each sender's events reach the hub, and
//! from there every peer's outbound queue, in order.  Commands from different
//! sessions interleave arbitrarily.
//!
//! # Fan-out never waits
//!
//! [`ChannelOutbox`] uses `try_send`.  A browser whose queue is full or
//! closed misses that event; the hub moves on to the next peer immediately.

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use whiteboard_core::{
    ClientMessage, ColorPalette, DeliveryError, HubStats, LifecycleManager, Outbox, ServerMessage,
    Session, SessionId,
};

// ── Outbox adapter ────────────────────────────────────────────────────────────

/// Sending half of one session's outbound queue.
///
/// The receiving half is drained by that session's WebSocket writer.
#[derive(Debug, Clone)]
pub struct ChannelOutbox {
    tx: mpsc::Sender<ServerMessage>,
}

impl ChannelOutbox {
    /// Creates a bounded outbound queue for one session.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl Outbox for ChannelOutbox {
    fn deliver(&self, message: &ServerMessage) -> Result<(), DeliveryError> {
        self.tx.try_send(message.clone()).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Errors returned by [`HubHandle`] methods.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubServiceError {
    /// The hub task has exited, so no command can be processed.
    #[error("hub task has stopped")]
    Stopped,
}

/// One transport event for the hub to apply.
#[derive(Debug)]
pub enum HubCommand {
    /// A browser completed its WebSocket handshake.
    Connect {
        outbox: ChannelOutbox,
        reply: oneshot::Sender<Session>,
    },
    /// A browser sent a message.
    Message {
        session_id: SessionId,
        message: ClientMessage,
    },
    /// A browser's connection ended.
    Disconnect { session_id: SessionId },
    /// Diagnostics query.
    Stats { reply: oneshot::Sender<HubStats> },
}

/// Cloneable handle used by session tasks to talk to the hub.
///
/// The hub task exits once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Registers a new session and waits for its assigned identity.
    ///
    /// By the time this returns, the `setColor` message is already queued on
    /// the session's outbound channel.
    pub async fn connect(&self, outbox: ChannelOutbox) -> Result<Session, HubServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Connect { outbox, reply }).await?;
        rx.await.map_err(|_| HubServiceError::Stopped)
    }

    /// Queues a client message for relay.  Does not wait for the fan-out.
    pub async fn submit(
        &self,
        session_id: SessionId,
        message: ClientMessage,
    ) -> Result<(), HubServiceError> {
        self.send(HubCommand::Message {
            session_id,
            message,
        })
        .await
    }

    /// Queues removal of a session.
    pub async fn disconnect(&self, session_id: SessionId) -> Result<(), HubServiceError> {
        self.send(HubCommand::Disconnect { session_id }).await
    }

    /// Returns live/total session counts.
    ///
    /// Because commands are processed in order, the answer reflects every
    /// command this handle sent before calling `stats`.
    pub async fn stats(&self) -> Result<HubStats, HubServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Stats { reply }).await?;
        rx.await.map_err(|_| HubServiceError::Stopped)
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubServiceError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| HubServiceError::Stopped)
    }
}

// ── Hub task ──────────────────────────────────────────────────────────────────

/// Spawns the hub task and returns a handle to it.
///
/// # Panics
///
/// Panics if `capacity` is zero (a tokio `mpsc` requirement).
pub fn spawn_hub(palette: ColorPalette, capacity: usize) -> (HubHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity);
    let manager = LifecycleManager::new(palette);
    let task = tokio::spawn(run_hub(manager, rx));
    (HubHandle { tx }, task)
}

/// Applies commands until every [`HubHandle`] has been dropped.
///
/// Each command is handled to completion before the next is received; no
/// step awaits anything.
pub async fn run_hub(
    mut manager: LifecycleManager<ChannelOutbox>,
    mut rx: mpsc::Receiver<HubCommand>,
) {
    info!("hub started");

    while let Some(command) = rx.recv().await {
        match command {
            HubCommand::Connect { outbox, reply } => {
                let session = manager.on_connect(outbox);
                if reply.send(session.clone()).is_err() {
                    // The session task went away before learning its id.
                    debug!("session {}: connect reply dropped", session.id());
                    manager.on_disconnect(&session.id());
                }
            }
            HubCommand::Message {
                session_id,
                message,
            } => {
                let outcome = manager.on_message(&session_id, message);
                debug!("session {session_id}: relay outcome {outcome:?}");
            }
            HubCommand::Disconnect { session_id } => {
                manager.on_disconnect(&session_id);
            }
            HubCommand::Stats { reply } => {
                let _ = reply.send(manager.stats());
            }
        }
    }

    info!(
        "hub stopped after {} connection(s)",
        manager.stats().connections_total
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use whiteboard_core::Color;

    fn draw(x: f64, y: f64, brush_size: f64) -> ClientMessage {
        ClientMessage::Draw { x, y, brush_size }
    }

    #[test]
    fn test_channel_outbox_reports_full_queue() {
        // Arrange: room for exactly one message
        let (outbox, _rx) = ChannelOutbox::channel(1);

        // Act
        let first = outbox.deliver(&ServerMessage::Clear);
        let second = outbox.deliver(&ServerMessage::Clear);

        // Assert
        assert_eq!(first, Ok(()));
        assert_eq!(second, Err(DeliveryError::Full));
    }

    #[test]
    fn test_channel_outbox_reports_closed_queue() {
        let (outbox, rx) = ChannelOutbox::channel(4);
        drop(rx);
        assert_eq!(outbox.deliver(&ServerMessage::Clear), Err(DeliveryError::Closed));
    }

    #[tokio::test]
    async fn test_connect_queues_set_color_first() {
        let (hub, _task) = spawn_hub(ColorPalette::default(), 16);
        let (outbox, mut rx) = ChannelOutbox::channel(16);

        let session = hub.connect(outbox).await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(ServerMessage::SetColor {
                color: Color::parse("#FF0000").unwrap()
            })
        );
        assert_eq!(session.color().as_str(), "#FF0000");
    }

    #[tokio::test]
    async fn test_draw_reaches_peer_but_not_sender() {
        // Arrange
        let (hub, _task) = spawn_hub(ColorPalette::default(), 16);
        let (a_out, mut a_rx) = ChannelOutbox::channel(16);
        let (b_out, mut b_rx) = ChannelOutbox::channel(16);
        let a = hub.connect(a_out).await.unwrap();
        let _b = hub.connect(b_out).await.unwrap();
        a_rx.recv().await.unwrap(); // setColor
        b_rx.recv().await.unwrap(); // setColor

        // Act
        hub.submit(a.id(), draw(10.0, 10.0, 5.0)).await.unwrap();
        hub.stats().await.unwrap(); // barrier: the draw has been handled

        // Assert
        match b_rx.recv().await {
            Some(ServerMessage::Draw(event)) => {
                assert_eq!((event.x, event.y, event.brush_size), (10.0, 10.0, 5.0));
                assert_eq!(event.color.as_str(), "#FF0000");
            }
            other => panic!("expected draw, got {other:?}"),
        }
        assert!(a_rx.try_recv().is_err(), "sender must not receive its own draw");
    }

    #[tokio::test]
    async fn test_disconnect_updates_stats() {
        let (hub, _task) = spawn_hub(ColorPalette::default(), 16);
        let (a_out, _a_rx) = ChannelOutbox::channel(16);
        let (b_out, _b_rx) = ChannelOutbox::channel(16);
        let a = hub.connect(a_out).await.unwrap();
        hub.connect(b_out).await.unwrap();

        hub.disconnect(a.id()).await.unwrap();
        let stats = hub.stats().await.unwrap();

        assert_eq!(stats.live_sessions, 1);
        assert_eq!(stats.connections_total, 2);
    }

    #[tokio::test]
    async fn test_full_peer_does_not_block_other_peers() {
        // Arrange: B's queue holds only its setColor, C has room
        let (hub, _task) = spawn_hub(ColorPalette::default(), 16);
        let (a_out, _a_rx) = ChannelOutbox::channel(16);
        let (b_out, _b_rx) = ChannelOutbox::channel(1);
        let (c_out, mut c_rx) = ChannelOutbox::channel(16);
        let a = hub.connect(a_out).await.unwrap();
        hub.connect(b_out).await.unwrap();
        hub.connect(c_out).await.unwrap();
        c_rx.recv().await.unwrap(); // setColor

        // Act
        hub.submit(a.id(), ClientMessage::Clear).await.unwrap();
        hub.stats().await.unwrap();

        // Assert
        assert_eq!(c_rx.recv().await, Some(ServerMessage::Clear));
    }

    #[tokio::test]
    async fn test_unanswered_connect_leaves_no_session_behind() {
        // Arrange: the session task is gone before the hub replies
        let (hub, _task) = spawn_hub(ColorPalette::default(), 16);
        let (outbox, _rx) = ChannelOutbox::channel(16);
        let (reply, reply_rx) = oneshot::channel();
        drop(reply_rx);

        // Act
        hub.send(HubCommand::Connect { outbox, reply }).await.unwrap();
        let stats = hub.stats().await.unwrap();

        // Assert: registered then removed again
        assert_eq!(stats.live_sessions, 0);
        assert_eq!(stats.connections_total, 1);
    }

    #[tokio::test]
    async fn test_hub_stops_when_all_handles_drop() {
        let (hub, task) = spawn_hub(ColorPalette::default(), 4);
        drop(hub);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_reports_stopped_hub() {
        let (hub, task) = spawn_hub(ColorPalette::default(), 4);
        task.abort();
        let _ = task.await;

        assert_eq!(hub.stats().await, Err(HubServiceError::Stopped));
    }
}
