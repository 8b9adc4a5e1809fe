//! # whiteboard-core
//!
//! Shared library for the collaborative whiteboard containing the session
//! registry, the color-assignment policy, the draw/clear event relay, and the
//! JSON wire protocol spoken with browsers.
//!
//! It has zero dependencies on sockets or async runtimes.  The server crate
//! plugs a concrete transport in through the [`Outbox`] trait.
//!
//! # Architecture overview
//!
//! Several browsers draw on one shared canvas.  Each browser gets its own
//! color when it connects, and every stroke it draws is replayed on every
//! other browser in that color.
//!
//! - **`domain`** – Plain value types: [`Color`], [`ColorPalette`],
//!   [`Session`], [`DrawEvent`].
//!
//! - **`protocol`** – The JSON messages exchanged with browsers and the
//!   helpers that encode/decode them.
//!
//! - **`hub`** – The three cooperating pieces that make up the relay core:
//!
//!   ```text
//!   connect ──► LifecycleManager ──► SessionRegistry::register ──► setColor (new client only)
//!   draw    ──► LifecycleManager ──► relay::relay_draw ──► send_to_all_except(sender)
//!   close   ──► LifecycleManager ──► SessionRegistry::unregister
//!   ```

pub mod domain;
pub mod hub;
pub mod protocol;

pub use domain::color::{Color, ColorPalette, PaletteError};
pub use domain::event::{DrawEvent, Point};
pub use domain::session::{Session, SessionId};
pub use hub::lifecycle::{ConnectionState, HubStats, LifecycleManager};
pub use hub::outbox::{DeliveryError, Outbox};
pub use hub::registry::{FanOut, HubError, SessionRegistry};
pub use hub::relay::RelayOutcome;
pub use protocol::codec::{
    decode_client_message, encode_server_message, ProtocolError, MAX_FRAME_LEN,
};
pub use protocol::messages::{ClientMessage, ServerMessage};
