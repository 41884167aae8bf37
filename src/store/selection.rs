//! Ordered list of currently open project ids.

use uuid::Uuid;

use super::{Store, StoreSubscription};

/// Selection behaves as recently-used ordering: `set` keeps the last
/// occurrence of a duplicated id, so re-selecting a project moves it to the
/// tail rather than listing it twice.
#[derive(Clone)]
pub struct SelectionStore {
    ids: Store<Vec<Uuid>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self {
            ids: Store::new(Vec::new()),
        }
    }

    pub fn set(&self, ids: Vec<Uuid>) {
        let mut deduped: Vec<Uuid> = Vec::with_capacity(ids.len());
        for id in ids.into_iter().rev() {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        deduped.reverse();
        self.ids.set(deduped);
    }

    pub fn remove(&self, id: Uuid) {
        self.ids
            .update(|ids| ids.into_iter().filter(|existing| *existing != id).collect());
    }

    /// Most recently selected project, if any.
    pub fn latest(&self) -> Option<Uuid> {
        self.ids.get().last().copied()
    }

    pub fn get(&self) -> Vec<Uuid> {
        self.ids.get()
    }

    pub fn clear(&self) {
        self.ids.set(Vec::new());
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&Vec<Uuid>) + Send + Sync + 'static,
    ) -> StoreSubscription<Vec<Uuid>> {
        self.ids.subscribe(observer)
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}
