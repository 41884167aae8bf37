//! Bounded FIFO store for the backend's debug log stream.

use std::collections::VecDeque;

use crate::domain::LogEvent;

use super::{Store, StoreSubscription};

pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Append-only log mirror. Once the retained count exceeds the configured
/// capacity the oldest entries are dropped; writes are never rejected.
#[derive(Clone)]
pub struct LogStore {
    entries: Store<VecDeque<LogEvent>>,
    capacity: usize,
}

impl LogStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Store::new(VecDeque::new()),
            capacity,
        }
    }

    pub fn add(&self, event: LogEvent) {
        let capacity = self.capacity;
        self.entries.update(|mut entries| {
            entries.push_back(event);
            while entries.len() > capacity {
                entries.pop_front();
            }
            entries
        });
    }

    pub fn clear(&self) {
        self.entries.set(VecDeque::new());
    }

    pub fn get(&self) -> Vec<LogEvent> {
        self.entries.get().into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.get().is_empty()
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&VecDeque<LogEvent>) + Send + Sync + 'static,
    ) -> StoreSubscription<VecDeque<LogEvent>> {
        self.entries.subscribe(observer)
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
