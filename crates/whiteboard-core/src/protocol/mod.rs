//! Browser-facing wire protocol.
//!
//! Every WebSocket text frame carries one JSON object whose `"type"` field
//! names the message:
//!
//! ```text
//! server → client   {"type":"setColor","color":"#FF0000"}
//! client → server   {"type":"draw","x":10,"y":10,"brushSize":5}
//! server → client   {"type":"draw","x":10,"y":10,"brushSize":5,"color":"#FF0000"}
//! client → server   {"type":"clear"}
//! server → client   {"type":"clear"}
//! ```

pub mod codec;
pub mod messages;

pub use codec::{decode_client_message, encode_server_message, ProtocolError, MAX_FRAME_LEN};
pub use messages::{ClientMessage, ServerMessage};
