//! The relay core: registry, relay, and connection lifecycle.
//!
//! These types take `&mut self` and hold no locks.  They are owned by exactly
//! one task (the hub), which handles one transport event at a time.

pub mod lifecycle;
pub mod outbox;
pub mod registry;
pub mod relay;

#[cfg(test)]
pub(crate) mod test_support;

pub use lifecycle::{ConnectionState, HubStats, LifecycleManager};
pub use outbox::{DeliveryError, Outbox};
pub use registry::{FanOut, HubError, SessionRegistry};
pub use relay::{relay_clear, relay_draw, RelayOutcome};
