//! Verbatim mirror of a backend-owned record list.

use super::{Store, StoreSubscription};

/// Holds whatever records the backend last pushed. `set` fully replaces the
/// list, `add` appends without dedup; interpretation of the records is the
/// caller's business.
#[derive(Clone)]
pub struct SnapshotStore<T> {
    records: Store<Vec<T>>,
}

impl<T: Clone + Send + Sync + 'static> SnapshotStore<T> {
    pub fn new() -> Self {
        Self {
            records: Store::new(Vec::new()),
        }
    }

    pub fn set(&self, records: Vec<T>) {
        self.records.set(records);
    }

    pub fn add(&self, record: T) {
        self.records.update(|mut records| {
            records.push(record);
            records
        });
    }

    pub fn clear(&self) {
        self.records.set(Vec::new());
    }

    pub fn get(&self) -> Vec<T> {
        self.records.get()
    }

    pub fn len(&self) -> usize {
        self.records.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.get().is_empty()
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&Vec<T>) + Send + Sync + 'static,
    ) -> StoreSubscription<Vec<T>> {
        self.records.subscribe(observer)
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SnapshotStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
