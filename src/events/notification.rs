//! Notification values exchanged over an event bus.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the notification that asks a machine to handle an action.
///
/// The action name travels in [`Notification::kind`], the payload in
/// [`Notification::body`].
pub const ACTION: &str = "/notes/action";

/// Name of the notification published after every committed transition.
///
/// The body is the new current state, the kind is its name.
pub const CHANGED: &str = "/notes/changed";

/// Name of the notification that vetoes the transition in flight.
pub const CANCEL: &str = "/notes/cancel";

/// A named message with an opaque body and an optional type tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub name: String,
    #[serde(default)]
    pub body: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Notification {
    /// Create a notification with a body and no kind.
    pub fn new(name: impl Into<String>, body: Value) -> Self {
        Self {
            name: name.into(),
            body,
            kind: None,
        }
    }

    /// Attach a kind to the notification.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// An [`ACTION`] notification for `action` carrying `payload`.
    pub fn action(action: impl Into<String>, payload: Value) -> Self {
        Self::new(ACTION, payload).with_kind(action)
    }

    /// A [`CANCEL`] notification.
    pub fn cancel() -> Self {
        Self::new(CANCEL, Value::Null)
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}
