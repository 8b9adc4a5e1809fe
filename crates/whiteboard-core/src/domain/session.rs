//! Session identity.
//!
//! A [`Session`] is the server-side record of one live browser connection.
//! It is created by the registry on connect and never mutated afterwards: the
//! color it carries is fixed for the whole lifetime of the connection.  A
//! browser that reconnects gets a brand-new session (new id, new color).

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::color::Color;

/// Opaque identifier of one connection.
///
/// Backed by a random UUID v4, so two connections never share an id even if
/// they come from the same browser tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 hex digits only; used in log lines.
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// One registered connection and the color it was assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    color: Color,
    connected_at: SystemTime,
}

impl Session {
    pub(crate) fn new(id: SessionId, color: Color) -> Self {
        Self {
            id,
            color,
            connected_at: SystemTime::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The color assigned at registration.  Never changes.
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// Wall-clock time at which the session was registered.
    pub fn connected_at(&self) -> SystemTime {
        self.connected_at
    }
}
