//! The reactive store primitive every higher-level store is built on.
//!
//! A `Store<T>` holds one value and notifies subscribed observers
//! synchronously, in subscription order, on every `set`/`update`. Notification
//! runs against a snapshot of the subscriber list, so an observer registered
//! from inside another observer's callback is not invoked until the next
//! mutation. No lock is held while observers run; re-entrant `subscribe`,
//! `set` or `get` from a callback cannot deadlock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct StoreInner<T> {
    value: Mutex<T>,
    observers: Mutex<Vec<(u64, Observer<T>)>>,
    next_id: AtomicU64,
}

/// Shared handle to a reactive value. Cloning is cheap and every clone
/// addresses the same underlying state.
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                value: Mutex::new(initial),
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Latest committed value, readable with or without active observers.
    pub fn get(&self) -> T {
        self.inner.value.lock().expect("store value mutex poisoned").clone()
    }

    pub fn set(&self, value: T) {
        {
            let mut guard = self.inner.value.lock().expect("store value mutex poisoned");
            *guard = value.clone();
        }
        self.notify(&value);
    }

    /// Replace the value with `f(old)` and notify. Returns the new value so
    /// callers can act on what they just committed.
    pub fn update<F: FnOnce(T) -> T>(&self, f: F) -> T {
        let next = {
            let mut guard = self.inner.value.lock().expect("store value mutex poisoned");
            let next = f(guard.clone());
            *guard = next.clone();
            next
        };
        self.notify(&next);
        next
    }

    /// Register an observer invoked on every subsequent mutation. The handle
    /// removes only this registration; dropping it without calling
    /// [`StoreSubscription::unsubscribe`] leaves the observer attached.
    pub fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> StoreSubscription<T> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .observers
            .lock()
            .expect("store observer mutex poisoned")
            .push((id, Arc::new(observer)));
        StoreSubscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .lock()
            .expect("store observer mutex poisoned")
            .len()
    }

    fn notify(&self, value: &T) {
        // Snapshot first, then run callbacks without the lock.
        let snapshot: Vec<Observer<T>> = self
            .inner
            .observers
            .lock()
            .expect("store observer mutex poisoned")
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in snapshot {
            observer(value);
        }
    }
}

/// Removal handle for a single observer registration.
pub struct StoreSubscription<T> {
    store: Weak<StoreInner<T>>,
    id: u64,
}

impl<T> StoreSubscription<T> {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .observers
                .lock()
                .expect("store observer mutex poisoned")
                .retain(|(id, _)| *id != self.id);
        }
    }
}
