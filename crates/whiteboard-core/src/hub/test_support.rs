//! Test doubles shared by the hub unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::protocol::messages::ServerMessage;

use super::outbox::{DeliveryError, Outbox};

/// An outbox that records every message it accepts.
///
/// Clones share the same buffer, so a test keeps one clone and hands the
/// other to the registry.
#[derive(Clone, Default)]
pub(crate) struct Recorder(Rc<RefCell<Vec<ServerMessage>>>);

impl Recorder {
    pub(crate) fn messages(&self) -> Vec<ServerMessage> {
        self.0.borrow().clone()
    }
}

impl Outbox for Recorder {
    fn deliver(&self, message: &ServerMessage) -> Result<(), DeliveryError> {
        self.0.borrow_mut().push(message.clone());
        Ok(())
    }
}
