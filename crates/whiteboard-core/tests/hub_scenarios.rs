//! End-to-end scenarios for the relay core through its public API.
//!
//! Each test drives a [`LifecycleManager`] the way the server's hub task
//! does: connect, a stream of client messages, disconnect.  Outboxes are
//! in-memory inboxes so every test can inspect exactly what each browser
//! would have been sent.

use std::cell::RefCell;
use std::rc::Rc;

use whiteboard_core::{
    ClientMessage, Color, ColorPalette, DeliveryError, LifecycleManager, Outbox, RelayOutcome,
    ServerMessage, Session,
};

// ── Test outbox ───────────────────────────────────────────────────────────────

/// In-memory browser inbox.  Clones share the same buffer.
#[derive(Clone, Default)]
struct Inbox(Rc<RefCell<Vec<ServerMessage>>>);

impl Inbox {
    fn received(&self) -> Vec<ServerMessage> {
        self.0.borrow().clone()
    }

    fn draws(&self) -> Vec<(f64, f64, f64, String)> {
        self.received()
            .into_iter()
            .filter_map(|m| match m {
                ServerMessage::Draw(e) => Some((e.x, e.y, e.brush_size, e.color.to_string())),
                _ => None,
            })
            .collect()
    }
}

impl Outbox for Inbox {
    fn deliver(&self, message: &ServerMessage) -> Result<(), DeliveryError> {
        self.0.borrow_mut().push(message.clone());
        Ok(())
    }
}

fn connect(hub: &mut LifecycleManager<Inbox>) -> (Session, Inbox) {
    let inbox = Inbox::default();
    let session = hub.on_connect(inbox.clone());
    (session, inbox)
}

fn draw(x: f64, y: f64, brush_size: f64) -> ClientMessage {
    ClientMessage::Draw { x, y, brush_size }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn test_a_b_c_connect_and_a_draws() {
    // Arrange
    let mut hub = LifecycleManager::new(ColorPalette::default());
    let (a, a_in) = connect(&mut hub);
    let (b, b_in) = connect(&mut hub);
    let (c, c_in) = connect(&mut hub);

    assert_eq!(a.color().as_str(), "#FF0000");
    assert_eq!(b.color().as_str(), "#00FF00");
    assert_eq!(c.color().as_str(), "#0000FF");

    // Act
    hub.on_message(&a.id(), draw(10.0, 10.0, 5.0));

    // Assert
    let expected = vec![(10.0, 10.0, 5.0, "#FF0000".to_string())];
    assert_eq!(b_in.draws(), expected);
    assert_eq!(c_in.draws(), expected);
    assert_eq!(
        a_in.received(),
        vec![ServerMessage::SetColor {
            color: Color::parse("#FF0000").unwrap()
        }]
    );
}

#[test]
fn test_a_leaves_then_d_gets_next_slot_not_a_slot() {
    let mut hub = LifecycleManager::new(ColorPalette::default());
    let (a, _) = connect(&mut hub);
    let (_b, _) = connect(&mut hub);
    let (_c, _) = connect(&mut hub);

    hub.on_disconnect(&a.id());
    let (d, d_in) = connect(&mut hub);

    // Monotonic counter: D is connection #3 (0-indexed).
    assert_eq!(d.color().as_str(), "#FFFF00");
    assert_eq!(
        d_in.received(),
        vec![ServerMessage::SetColor {
            color: Color::parse("#FFFF00").unwrap()
        }]
    );
}

#[test]
fn test_palette_wraps_for_seventh_client() {
    let mut hub = LifecycleManager::new(ColorPalette::default());
    let sessions: Vec<Session> = (0..7).map(|_| connect(&mut hub).0).collect();

    assert_eq!(sessions[6].color(), sessions[0].color());
    assert_eq!(hub.stats().live_sessions, 7);
}

#[test]
fn test_custom_palette_is_used_in_order() {
    let palette = ColorPalette::from_strs(["#111111", "#222222"]).unwrap();
    let mut hub = LifecycleManager::new(palette);

    let colors: Vec<String> = (0..5)
        .map(|_| connect(&mut hub).0.color().to_string())
        .collect();

    assert_eq!(colors, ["#111111", "#222222", "#111111", "#222222", "#111111"]);
}

#[test]
fn test_interleaved_senders_keep_their_own_colors() {
    let mut hub = LifecycleManager::new(ColorPalette::default());
    let (a, _) = connect(&mut hub);
    let (b, _) = connect(&mut hub);
    let (_c, c_in) = connect(&mut hub);

    hub.on_message(&a.id(), draw(1.0, 1.0, 1.0));
    hub.on_message(&b.id(), draw(2.0, 2.0, 2.0));
    hub.on_message(&a.id(), draw(3.0, 3.0, 3.0));

    assert_eq!(
        c_in.draws(),
        vec![
            (1.0, 1.0, 1.0, "#FF0000".to_string()),
            (2.0, 2.0, 2.0, "#00FF00".to_string()),
            (3.0, 3.0, 3.0, "#FF0000".to_string()),
        ]
    );
}

#[test]
fn test_clear_twice_leaves_peer_in_cleared_state() {
    let mut hub = LifecycleManager::new(ColorPalette::default());
    let (a, _) = connect(&mut hub);
    let (_b, b_in) = connect(&mut hub);

    hub.on_message(&a.id(), ClientMessage::Clear);
    hub.on_message(&a.id(), ClientMessage::Clear);

    // Whatever the peer saw last is a clear, and nothing was drawn after it.
    let received = b_in.received();
    assert_eq!(received.last(), Some(&ServerMessage::Clear));
    assert!(b_in.draws().is_empty());
}

#[test]
fn test_departed_sender_is_silently_dropped() {
    let mut hub = LifecycleManager::new(ColorPalette::default());
    let (a, a_in) = connect(&mut hub);
    let (b, b_in) = connect(&mut hub);
    let (_c, c_in) = connect(&mut hub);

    hub.on_disconnect(&a.id());
    let dropped = hub.on_message(&a.id(), draw(5.0, 5.0, 5.0));
    let relayed = hub.on_message(&b.id(), draw(6.0, 6.0, 6.0));

    assert_eq!(dropped, RelayOutcome::Dropped);
    assert_eq!(relayed.delivered(), 1);
    assert_eq!(c_in.draws(), vec![(6.0, 6.0, 6.0, "#00FF00".to_string())]);
    // A was removed before B drew, so A's inbox holds only its setColor.
    assert_eq!(a_in.received().len(), 1);
    assert!(b_in.draws().is_empty());
}
