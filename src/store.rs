use dashmap::DashMap;
use uuid::Uuid;

/// Keyed in-memory storage shared across tasks. Mutations run under the
/// entry lock; snapshots clone out so callers never iterate while holding it.
pub struct Store<T> {
    inner: DashMap<Uuid, T>,
}

impl<T: Clone> Store<T> {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    pub fn insert(&self, id: Uuid, value: T) {
        self.inner.insert(id, value);
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.inner.get(id).map(|entry| entry.value().clone())
    }

    /// Runs `f` with the entry lock held, so a read-then-write through here
    /// is atomic per entity. Returns `None` for an unknown id.
    pub fn update<R>(&self, id: &Uuid, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.inner.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T: Clone> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
