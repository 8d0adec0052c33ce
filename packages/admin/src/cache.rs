use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

/// Lists the admin screens fetch and cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Criteria,
    ActiveCriteria,
    Rounds,
    Teams,
    Users,
}

#[derive(Default)]
struct Entry {
    /// Bumped on every invalidation.
    generation: u64,
    value: Option<Arc<dyn Any + Send + Sync>>,
}

/// Cached list data keyed by query. Writes invalidate the affected keys so
/// the next read refetches.
#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, Entry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly fetched value.
    pub fn put<T: Any + Send + Sync>(&self, key: QueryKey, value: T) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry(key).or_default().value = Some(Arc::new(value));
    }

    /// Cached value for `key`, if present and of type `T`.
    pub fn get<T: Any + Clone + Send + Sync>(&self, key: QueryKey) -> Option<T> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&key)?
            .value
            .as_ref()?
            .downcast_ref::<T>()
            .cloned()
    }

    pub fn is_cached(&self, key: QueryKey) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&key).is_some_and(|e| e.value.is_some())
    }

    /// Drop the cached value for `key`.
    pub fn invalidate(&self, key: QueryKey) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let entry = entries.entry(key).or_default();
        entry.value = None;
        entry.generation += 1;
        debug!(?key, generation = entry.generation, "Query invalidated");
    }

    /// Number of times `key` has been invalidated.
    pub fn generation(&self, key: QueryKey) -> u64 {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&key).map(|e| e.generation).unwrap_or(0)
    }
}
