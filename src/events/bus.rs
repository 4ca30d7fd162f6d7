//! Event bus seam and a synchronous in-process implementation.

use super::notification::Notification;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked for every notification published under a subscribed name.
pub type Listener = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Handle identifying one subscription on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Publish/subscribe capability a machine broadcasts through.
///
/// Implementations must deliver synchronously: every listener for a
/// notification has run by the time `publish` returns. A listener vetoes a
/// transition by cancelling while it is being called, so deferred delivery
/// would let every transition commit unconditionally.
pub trait EventBus: Send + Sync {
    /// Deliver `notification` to every listener subscribed to its name.
    fn publish(&self, notification: Notification);

    /// Register `listener` for notifications named `name`.
    fn subscribe(&self, name: &str, listener: Listener) -> SubscriptionId;

    /// Remove a subscription. Returns `false` if it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// A notification together with the time it was published.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub notification: Notification,
    pub published_at: DateTime<Utc>,
}

/// Synchronous in-process event bus.
///
/// Listeners run on the publishing thread, in subscription order. The bus
/// also keeps a bounded log of what was published, oldest first.
///
/// # Example
///
/// ```rust
/// use statemint::events::{EventBus, LocalBus, Notification};
/// use serde_json::json;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let bus = LocalBus::new();
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// bus.subscribe("ping", Arc::new(move |_: &Notification| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// bus.publish(Notification::new("ping", json!(null)));
///
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// assert_eq!(bus.published_names(), vec!["ping".to_string()]);
/// ```
pub struct LocalBus {
    listeners: RwLock<HashMap<String, Vec<(SubscriptionId, Listener)>>>,
    next_id: AtomicU64,
    log: Mutex<VecDeque<PublishedEvent>>,
    capacity: usize,
}

impl LocalBus {
    /// Create a bus that remembers the last 1000 notifications.
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    /// Create a bus that remembers the last `capacity` notifications.
    ///
    /// A capacity of zero disables the log.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            log: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Logged notifications, oldest first.
    pub fn published(&self) -> Vec<PublishedEvent> {
        self.log.lock().iter().cloned().collect()
    }

    /// Names of the logged notifications, oldest first.
    pub fn published_names(&self) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .map(|event| event.notification.name.clone())
            .collect()
    }

    /// Forget every logged notification.
    pub fn clear_log(&self) {
        self.log.lock().clear();
    }

    /// Number of listeners subscribed to `name`.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.listeners.read().get(name).map_or(0, Vec::len)
    }

    fn record(&self, notification: &Notification) {
        if self.capacity == 0 {
            return;
        }
        let mut log = self.log.lock();
        if log.len() == self.capacity {
            log.pop_front();
        }
        log.push_back(PublishedEvent {
            notification: notification.clone(),
            published_at: Utc::now(),
        });
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for LocalBus {
    fn publish(&self, notification: Notification) {
        self.record(&notification);

        // Listeners may publish or subscribe themselves, so no lock is held
        // while they run.
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .get(&notification.name)
            .map(|subscribed| {
                subscribed
                    .iter()
                    .map(|(_, listener)| Arc::clone(listener))
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            name = %notification.name,
            kind = ?notification.kind,
            listeners = listeners.len(),
            "publishing notification"
        );

        for listener in &listeners {
            listener(&notification);
        }
    }

    fn subscribe(&self, name: &str, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .entry(name.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let mut removed = false;
        listeners.retain(|_, subscribed| {
            let before = subscribed.len();
            subscribed.retain(|(existing, _)| *existing != id);
            removed |= subscribed.len() != before;
            !subscribed.is_empty()
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collector(bus: &LocalBus, name: &str) -> Arc<Mutex<Vec<Notification>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(
            name,
            Arc::new(move |note: &Notification| sink.lock().push(note.clone())),
        );
        seen
    }

    #[test]
    fn publish_reaches_matching_listeners_only() {
        let bus = LocalBus::new();
        let pings = collector(&bus, "ping");
        let pongs = collector(&bus, "pong");

        bus.publish(Notification::new("ping", json!(1)));

        assert_eq!(pings.lock().len(), 1);
        assert!(pongs.lock().is_empty());
    }

    #[test]
    fn listeners_run_before_publish_returns() {
        let bus = LocalBus::new();
        let seen = collector(&bus, "ping");

        bus.publish(Notification::new("ping", json!({"n": 7})));

        let seen = seen.lock();
        assert_eq!(seen[0].body, json!({"n": 7}));
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let bus = LocalBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for id in 0..3 {
            let order = Arc::clone(&order);
            bus.subscribe("ping", Arc::new(move |_: &Notification| order.lock().push(id)));
        }

        bus.publish(Notification::new("ping", json!(null)));

        assert_eq!(*order.lock(), vec![0, 1, 2]);
        assert_eq!(bus.subscriber_count("ping"), 3);
    }

    #[test]
    fn listener_can_publish_reentrantly() {
        let bus = Arc::new(LocalBus::new());
        let inner = Arc::clone(&bus);
        bus.subscribe(
            "outer",
            Arc::new(move |_: &Notification| inner.publish(Notification::new("inner", json!(null)))),
        );
        let inners = collector(&bus, "inner");

        bus.publish(Notification::new("outer", json!(null)));

        assert_eq!(inners.lock().len(), 1);
        assert_eq!(bus.published_names(), vec!["outer", "inner"]);
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let bus = LocalBus::new();
        let kept = collector(&bus, "ping");
        let dropped = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&dropped);
        let id = bus.subscribe("ping", Arc::new(move |_: &Notification| *counter.lock() += 1));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(Notification::new("ping", json!(null)));

        assert_eq!(*dropped.lock(), 0);
        assert_eq!(kept.lock().len(), 1);
        assert_eq!(bus.subscriber_count("ping"), 1);
    }

    #[test]
    fn log_is_bounded_by_capacity() {
        let bus = LocalBus::with_capacity(2);

        for name in ["a", "b", "c"] {
            bus.publish(Notification::new(name, json!(null)));
        }

        assert_eq!(bus.published_names(), vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_disables_log() {
        let bus = LocalBus::with_capacity(0);

        bus.publish(Notification::new("a", json!(null)));

        assert!(bus.published().is_empty());
    }

    #[test]
    fn clear_log_forgets_history() {
        let bus = LocalBus::new();
        bus.publish(Notification::new("a", json!(null)));

        bus.clear_log();

        assert!(bus.published_names().is_empty());
    }
}
