//! Serializes action delivery to a machine.
//!
//! A listener must not drive a machine from inside another transition of
//! the same machine. The mailbox sits between the bus and the machine:
//! actions are queued and handled one at a time by
//! [`StateMachine::drain`](crate::machine::StateMachine::drain), while
//! cancels are applied immediately so a veto still lands inside the
//! transition that is being published.

use super::bus::{EventBus, SubscriptionId};
use super::notification::{Notification, ACTION, CANCEL};
use crate::machine::Cancellation;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};

/// An action waiting to be handled.
#[derive(Clone, Debug, PartialEq)]
pub struct QueuedAction {
    pub action: String,
    pub payload: Value,
}

/// FIFO queue of actions received from a bus.
///
/// A connected mailbox unsubscribes from its bus when dropped. The bus only
/// holds weak references to it, so dropping the last handle is enough.
#[derive(Default)]
pub struct Mailbox {
    queue: Mutex<VecDeque<QueuedAction>>,
    connection: Option<(Arc<dyn EventBus>, Vec<SubscriptionId>)>,
}

impl Mailbox {
    /// A mailbox that is not subscribed to any bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a new mailbox to [`ACTION`] and [`CANCEL`] on `bus`.
    ///
    /// Cancels received from the bus are forwarded to `cancellation` while
    /// the cancel notification is being published.
    pub fn connect(bus: Arc<dyn EventBus>, cancellation: Cancellation) -> Arc<Self> {
        Arc::new_cyclic(|mailbox: &Weak<Self>| {
            let inbox = Weak::clone(mailbox);
            let on_action = bus.subscribe(
                ACTION,
                Arc::new(move |note: &Notification| {
                    let Some(inbox) = inbox.upgrade() else {
                        return;
                    };
                    match note.kind() {
                        Some(action) => inbox.push(action, note.body.clone()),
                        None => {
                            tracing::warn!("action notification without an action name, dropping")
                        }
                    }
                }),
            );
            let on_cancel = bus.subscribe(
                CANCEL,
                Arc::new(move |_: &Notification| cancellation.cancel()),
            );

            Self {
                queue: Mutex::new(VecDeque::new()),
                connection: Some((bus, vec![on_action, on_cancel])),
            }
        })
    }

    /// Whether the mailbox is subscribed to a bus.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Queue `action` behind everything already waiting.
    pub fn push(&self, action: impl Into<String>, payload: Value) {
        self.queue.lock().push_back(QueuedAction {
            action: action.into(),
            payload,
        });
    }

    /// Take the oldest queued action.
    pub fn pop(&self) -> Option<QueuedAction> {
        self.queue.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl Drop for Mailbox {
    fn drop(&mut self) {
        if let Some((bus, subscriptions)) = self.connection.take() {
            for id in subscriptions {
                bus.unsubscribe(id);
            }
        }
    }
}

impl std::fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailbox")
            .field("queued", &self.len())
            .field("connected", &self.is_connected())
            .finish()
    }
}
