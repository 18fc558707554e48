//! Named-event publish/subscribe.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Handle identifying one subscription; needed to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Event-name to ordered-subscriber-list mapping, generic over the payload.
///
/// Subscribers for an event are invoked synchronously, in subscription order,
/// within the tick that produced the event.
pub struct EventHub<E: 'static> {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<String, Vec<(SubscriptionId, Callback<E>)>>>,
}

impl<E: 'static> EventHub<E> {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Append a subscriber to `event`'s list.
    pub fn subscribe(
        &self,
        event: &str,
        callback: impl Fn(&E) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove one subscription. Returns whether anything was removed.
    pub fn unsubscribe(&self, event: &str, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let Some(list) = subscribers.get_mut(event) else {
            return false;
        };

        let before = list.len();
        list.retain(|(subscription, _)| *subscription != id);
        let removed = list.len() != before;

        if list.is_empty() {
            subscribers.remove(event);
        }
        removed
    }

    /// Invoke every current subscriber for `event`, in subscription order.
    ///
    /// Callbacks run outside the subscriber-table lock, so a callback may
    /// itself subscribe or unsubscribe without deadlocking. A callback added
    /// during emission is not invoked for the emission that added it.
    pub fn emit(&self, event: &str, payload: &E) {
        let callbacks: Vec<Callback<E>> = {
            let subscribers = self.subscribers.read();
            match subscribers.get(event) {
                Some(list) => list.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
                None => return,
            }
        };

        for callback in callbacks {
            callback(payload);
        }
    }

    /// Number of live subscriptions for `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers
            .read()
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl<E: 'static> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let hub: EventHub<u32> = EventHub::new();
        hub.emit("anything", &1);
    }

    #[test]
    fn test_subscribers_invoked_in_subscription_order() {
        let hub: EventHub<u32> = EventHub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..3u32 {
            let seen = Arc::clone(&seen);
            hub.subscribe("tick", move |payload: &u32| {
                seen.lock().push((tag, *payload));
            });
        }

        hub.emit("tick", &7);
        assert_eq!(*seen.lock(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn test_subscribers_are_per_event() {
        let hub: EventHub<u32> = EventHub::new();
        let hits = Arc::new(Mutex::new(0u32));

        let hits_clone = Arc::clone(&hits);
        hub.subscribe("a", move |_| *hits_clone.lock() += 1);

        hub.emit("b", &0);
        assert_eq!(*hits.lock(), 0);

        hub.emit("a", &0);
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_unsubscribe_removes_exactly_one() {
        let hub: EventHub<u32> = EventHub::new();
        let hits = Arc::new(Mutex::new(0u32));

        let first_hits = Arc::clone(&hits);
        let first = hub.subscribe("tick", move |_| *first_hits.lock() += 1);
        let second_hits = Arc::clone(&hits);
        hub.subscribe("tick", move |_| *second_hits.lock() += 1);

        assert_eq!(hub.subscriber_count("tick"), 2);
        assert!(hub.unsubscribe("tick", first));
        assert!(!hub.unsubscribe("tick", first));
        assert_eq!(hub.subscriber_count("tick"), 1);

        hub.emit("tick", &0);
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let hub: Arc<EventHub<u32>> = Arc::new(EventHub::new());
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let hub_clone = Arc::clone(&hub);
        let slot_clone = Arc::clone(&slot);
        let id = hub.subscribe("once", move |_| {
            if let Some(id) = slot_clone.lock().take() {
                hub_clone.unsubscribe("once", id);
            }
        });
        *slot.lock() = Some(id);

        hub.emit("once", &0);
        assert_eq!(hub.subscriber_count("once"), 0);
    }
}
