//! Text-frame encoding and decoding.
//!
//! The protocol is one JSON object per WebSocket text frame, so the codec is
//! a thin layer over `serde_json` that maps failures into [`ProtocolError`].

use thiserror::Error;

use super::messages::{ClientMessage, ServerMessage};

/// Errors that can occur while encoding or decoding a frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON or does not match any known message.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame exceeds [`MAX_FRAME_LEN`].
    #[error("frame of {len} bytes exceeds the {max}-byte limit")]
    FrameTooLarge { len: usize, max: usize },
}

/// Upper bound on an inbound text frame.
///
/// A draw message is well under 100 bytes; anything near this limit is not a
/// whiteboard client.
pub const MAX_FRAME_LEN: usize = 4096;

/// Decodes one text frame sent by a browser.
///
/// # Errors
///
/// Returns [`ProtocolError::FrameTooLarge`] for oversized frames and
/// [`ProtocolError::Json`] when the JSON does not describe a [`ClientMessage`].
///
/// # Example
///
/// ```rust
/// use whiteboard_core::{decode_client_message, ClientMessage};
///
/// let msg = decode_client_message(r#"{"type":"clear"}"#).unwrap();
/// assert_eq!(msg, ClientMessage::Clear);
/// ```
pub fn decode_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    if text.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            len: text.len(),
            max: MAX_FRAME_LEN,
        });
    }
    Ok(serde_json::from_str(text)?)
}

/// Encodes one server message into the text of a WebSocket frame.
///
/// # Errors
///
/// Returns [`ProtocolError::Json`] if serialization fails.
pub fn encode_server_message(message: &ServerMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}
