//! JSON message types for the browser-facing WebSocket protocol.
//!
//! # JSON discriminant
//!
//! Every message is a JSON object with a `"type"` field that identifies the
//! variant.  All other fields sit in the same object:
//!
//! ```json
//! {"type":"draw","x":100,"y":200,"brushSize":4}
//! ```
//!
//! Serde's `#[serde(tag = "type")]` attribute handles this automatically.
//!
//! # Why two enums?
//!
//! Browsers only ever send `draw` and `clear`; only the server sends
//! `setColor`.  Keeping the directions apart makes it a compile-time error to
//! relay a message in the wrong direction.

use serde::{Deserialize, Serialize};

use crate::domain::color::Color;
use crate::domain::event::{DrawEvent, Point};

// ── Client → Server messages ──────────────────────────────────────────────────

/// All messages a browser can send to the server.
///
/// # Serde representation
///
/// ```json
/// {"type":"draw","x":12.5,"y":40,"brushSize":5}
/// {"type":"clear"}
/// ```
///
/// Unknown fields are ignored, so a browser that also sends its locally
/// picked `"color"` is accepted; that color is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// The sender drew a line segment ending at `(x, y)`.
    Draw {
        x: f64,
        y: f64,
        #[serde(rename = "brushSize")]
        brush_size: f64,
    },

    /// The sender wiped its canvas and asks every peer to do the same.
    Clear,
}

impl ClientMessage {
    /// Short variant name for log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            ClientMessage::Draw { .. } => "draw",
            ClientMessage::Clear => "clear",
        }
    }

    /// Convenience constructor used by tests and demo clients.
    pub fn draw(point: Point, brush_size: f64) -> Self {
        ClientMessage::Draw {
            x: point.x,
            y: point.y,
            brush_size,
        }
    }
}

// ── Server → Client messages ──────────────────────────────────────────────────

/// All messages the server sends to a browser.
///
/// # Serde representation
///
/// ```json
/// {"type":"setColor","color":"#00FF00"}
/// {"type":"draw","x":12.5,"y":40.0,"brushSize":5.0,"color":"#FF0000"}
/// {"type":"clear"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent once, only to the newly connected browser, right after connect.
    SetColor { color: Color },

    /// A peer's stroke, stamped with that peer's assigned color.
    Draw(DrawEvent),

    /// A peer cleared the canvas.
    Clear,
}

impl ServerMessage {
    /// Short variant name for log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            ServerMessage::SetColor { .. } => "setColor",
            ServerMessage::Draw(_) => "draw",
            ServerMessage::Clear => "clear",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
