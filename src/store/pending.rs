//! Registry of in-flight cancellable operations.
//!
//! Every operation the coordinator starts is tracked here from registration
//! until removal, so any subset (or all of them, e.g. on navigation away or
//! app teardown) can be cancelled. Built on the reactive store so the
//! in-flight set itself is observable.

use std::collections::HashMap;

use crate::ops::{CancelHandle, OperationId};

use super::{Store, StoreSubscription};

#[derive(Clone)]
pub struct OperationEntry {
    pub id: OperationId,
    pub cancel: CancelHandle,
}

#[derive(Clone)]
pub struct PendingOperations {
    entries: Store<HashMap<OperationId, OperationEntry>>,
}

impl PendingOperations {
    pub fn new() -> Self {
        Self {
            entries: Store::new(HashMap::new()),
        }
    }

    pub fn insert(&self, entry: OperationEntry) {
        self.entries.update(|mut entries| {
            entries.insert(entry.id, entry);
            entries
        });
    }

    /// Remove the entry and invoke its cancel handle. No-op for absent keys,
    /// so cancelling twice or after natural completion is safe.
    pub fn cancel(&self, id: OperationId) -> bool {
        let mut removed = None;
        self.entries.update(|mut entries| {
            removed = entries.remove(&id);
            entries
        });
        match removed {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every tracked operation and leave the registry empty. Returns
    /// how many entries were cancelled.
    pub fn cancel_all(&self) -> usize {
        let mut drained = HashMap::new();
        self.entries.update(|entries| {
            drained = entries;
            HashMap::new()
        });
        let count = drained.len();
        for entry in drained.into_values() {
            entry.cancel.cancel();
        }
        count
    }

    /// Remove without invoking the cancel handle; used when an operation
    /// settles on its own.
    pub fn discard(&self, id: OperationId) {
        self.entries.update(|mut entries| {
            entries.remove(&id);
            entries
        });
    }

    pub fn contains(&self, id: OperationId) -> bool {
        self.entries.get().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.get().is_empty()
    }

    pub fn ids(&self) -> Vec<OperationId> {
        self.entries.get().keys().copied().collect()
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&HashMap<OperationId, OperationEntry>) + Send + Sync + 'static,
    ) -> StoreSubscription<HashMap<OperationId, OperationEntry>> {
        self.entries.subscribe(observer)
    }
}

impl Default for PendingOperations {
    fn default() -> Self {
        Self::new()
    }
}
