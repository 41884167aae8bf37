//! Named-channel publish/subscribe transport between UI and backend.
//!
//! The bus does no payload transformation or validation; it fans a
//! `serde_json::Value` out to whoever is subscribed to the channel at emit
//! time. Handlers run synchronously in registration order against a snapshot
//! of the subscriber list, and a misbehaving handler cannot stop delivery to
//! the handlers after it.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use serde_json::Value;

type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

struct BusInner {
    channels: DashMap<String, Vec<(u64, Handler)>>,
    next_id: AtomicU64,
}

/// Shared handle to the bus. Cloning is cheap and every clone addresses the
/// same channel table.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                channels: DashMap::new(),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register a handler on a channel. The returned handle removes only this
    /// registration; any number of independent subscriptions may coexist on
    /// the same channel.
    pub fn subscribe(
        &self,
        channel: impl Into<String>,
        handler: impl Fn(&Value) + Send + Sync + 'static,
    ) -> BusSubscription {
        let channel = channel.into();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .channels
            .entry(channel.clone())
            .or_default()
            .push((id, Arc::new(handler)));
        BusSubscription {
            bus: Arc::downgrade(&self.inner),
            channel,
            id,
        }
    }

    /// Remove every handler registered on the channel.
    pub fn unsubscribe_channel(&self, channel: &str) {
        self.inner.channels.remove(channel);
    }

    /// Deliver a payload to the channel's current subscribers.
    pub fn emit(&self, channel: &str, payload: Value) {
        let handlers: Vec<Handler> = match self.inner.channels.get(channel) {
            Some(entry) => entry.iter().map(|(_, handler)| Arc::clone(handler)).collect(),
            None => Vec::new(),
        };
        if handlers.is_empty() {
            tracing::debug!("event on {channel} had no subscribers");
            return;
        }
        for handler in handlers {
            // One panicking handler must not take down delivery for the rest.
            if catch_unwind(AssertUnwindSafe(|| handler(&payload))).is_err() {
                tracing::warn!("event handler panicked on channel {channel}");
            }
        }
    }

    pub fn handler_count(&self, channel: &str) -> usize {
        self.inner
            .channels
            .get(channel)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Removal handle for a single channel registration.
pub struct BusSubscription {
    bus: Weak<BusInner>,
    channel: String,
    id: u64,
}

impl BusSubscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.bus.upgrade() {
            if let Some(mut entry) = inner.channels.get_mut(&self.channel) {
                entry.retain(|(existing, _)| *existing != self.id);
            }
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn fans_out_to_all_subscribers_in_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        let _s1 = bus.subscribe("channel", move |payload| {
            first.lock().unwrap().push(("first", payload.clone()));
        });
        let second = Arc::clone(&seen);
        let _s2 = bus.subscribe("channel", move |payload| {
            second.lock().unwrap().push(("second", payload.clone()));
        });

        bus.emit("channel", json!("hello"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", json!("hello")), ("second", json!("hello"))]
        );
    }

    #[test]
    fn unsubscribe_removes_only_that_registration() {
        let bus = EventBus::new();
        let hits = Arc::new(Mutex::new(0));

        let counted = Arc::clone(&hits);
        let keep = bus.subscribe("channel", move |_| *counted.lock().unwrap() += 1);
        let dropped = bus.subscribe("channel", |_| {});

        dropped.unsubscribe();
        assert_eq!(bus.handler_count("channel"), 1);

        bus.emit("channel", Value::Null);
        assert_eq!(*hits.lock().unwrap(), 1);
        keep.unsubscribe();
        assert_eq!(bus.handler_count("channel"), 0);
    }

    #[test]
    fn unsubscribe_channel_clears_every_handler() {
        let bus = EventBus::new();
        let _s1 = bus.subscribe("channel", |_| {});
        let _s2 = bus.subscribe("channel", |_| {});
        assert_eq!(bus.handler_count("channel"), 2);

        bus.unsubscribe_channel("channel");
        assert_eq!(bus.handler_count("channel"), 0);
    }

    #[test]
    fn panicking_handler_does_not_block_later_handlers() {
        let bus = EventBus::new();
        let hits = Arc::new(Mutex::new(0));

        let _bad = bus.subscribe("channel", |_| panic!("malformed payload"));
        let counted = Arc::clone(&hits);
        let _good = bus.subscribe("channel", move |_| *counted.lock().unwrap() += 1);

        bus.emit("channel", json!({"not": "what anyone expected"}));
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn emit_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.emit("nobody-home", json!(1));
    }
}
