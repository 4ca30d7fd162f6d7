//! Notifications and the bus they travel on.
//!
//! # Key Concepts
//!
//! - **Notification**: a name, an opaque JSON body and an optional kind
//! - **EventBus**: the publish/subscribe seam a machine is built with
//! - **LocalBus**: synchronous in-process bus with a bounded publish log
//! - **Mailbox**: queues bus actions so a machine handles them one at a time
//!
//! Delivery must be synchronous. A listener vetoes a transition by
//! cancelling while it is being called, and the machine reads the veto as
//! soon as `publish` returns.

mod bus;
mod mailbox;
mod notification;

pub use bus::{EventBus, Listener, LocalBus, PublishedEvent, SubscriptionId};
pub use mailbox::{Mailbox, QueuedAction};
pub use notification::{Notification, ACTION, CANCEL, CHANGED};
