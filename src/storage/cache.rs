//! Explicit snapshot cache.
//!
//! Sits in front of the task and user stores. Invalidation is a visible
//! contract: the lifecycle layer calls [`SnapshotCache::invalidate`]
//! after every mutating operation, rather than relying on any implicit
//! eviction policy.

use dashmap::DashMap;

/// Id-keyed cache of entity snapshots.
#[derive(Debug)]
pub struct SnapshotCache<T: Clone> {
    entries: DashMap<i64, T>,
    enabled: bool,
}

impl<T: Clone> SnapshotCache<T> {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: DashMap::new(),
            enabled,
        }
    }

    pub fn get(&self, id: i64) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let hit = self.entries.get(&id).map(|entry| entry.value().clone());
        tracing::debug!(id, hit = hit.is_some(), "snapshot cache lookup");
        hit
    }

    pub fn put(&self, id: i64, snapshot: T) {
        if self.enabled {
            self.entries.insert(id, snapshot);
        }
    }

    /// Drop the cached snapshot for an id. Called after every mutation of
    /// the underlying entity.
    pub fn invalidate(&self, id: i64) {
        self.entries.remove(&id);
        tracing::debug!(id, "snapshot cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_invalidate() {
        let cache: SnapshotCache<String> = SnapshotCache::new(true);
        cache.put(1, "snapshot".to_string());
        assert_eq!(cache.get(1).as_deref(), Some("snapshot"));

        cache.invalidate(1);
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let cache: SnapshotCache<String> = SnapshotCache::new(false);
        cache.put(1, "snapshot".to_string());
        assert!(cache.get(1).is_none());
        assert!(cache.is_empty());
    }
}
