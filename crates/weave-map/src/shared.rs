//! Lock-wrapped map for concurrent callers.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::{MapResult, MultiVersionMap, Version};

/// A [`MultiVersionMap`] behind a reader-writer lock.
///
/// Each append holds the write lock across the counter bump, the list append
/// and the neighbour relinking, so concurrent appends are serialized and
/// always observe consistent links. Reads share the lock and return owned
/// copies.
pub struct SharedMap<K, P> {
    inner: Arc<RwLock<MultiVersionMap<K, P>>>,
}

impl<K, P> Clone for SharedMap<K, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, P> std::fmt::Debug for SharedMap<K, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedMap")
            .field(&*self.inner.read())
            .finish()
    }
}

impl<K, P> From<MultiVersionMap<K, P>> for SharedMap<K, P> {
    fn from(map: MultiVersionMap<K, P>) -> Self {
        Self::new(map)
    }
}

impl<K, P> SharedMap<K, P> {
    /// Share `map`.
    #[must_use]
    pub fn new(map: MultiVersionMap<K, P>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Borrow the map for several reads under one lock.
    pub fn read(&self) -> RwLockReadGuard<'_, MultiVersionMap<K, P>> {
        self.inner.read()
    }
}

impl<K: Ord + Clone, P: Clone> SharedMap<K, P> {
    /// See [`MultiVersionMap::append`].
    pub fn append(&self, key: K, payload: P) -> MapResult<Version> {
        self.inner.write().append(key, payload)
    }

    /// See [`MultiVersionMap::get`].
    #[must_use]
    pub fn get(&self, key: &K, timestamp: Version) -> Option<P> {
        self.inner
            .read()
            .get(key, timestamp)
            .map(|(_, payload)| payload.clone())
    }

    /// See [`MultiVersionMap::snapshot`].
    #[must_use]
    pub fn snapshot(&self, timestamp: Version) -> Vec<(K, P)> {
        owned(self.inner.read().snapshot(timestamp))
    }

    /// See [`MultiVersionMap::range_snapshot`].
    pub fn range_snapshot(
        &self,
        from: &K,
        from_inclusive: bool,
        to: &K,
        to_inclusive: bool,
        timestamp: Version,
    ) -> MapResult<Vec<(K, P)>> {
        self.inner
            .read()
            .range_snapshot(from, from_inclusive, to, to_inclusive, timestamp)
            .map(owned)
    }

    /// See [`MultiVersionMap::current_version`].
    #[must_use]
    pub fn current_version(&self) -> Version {
        self.inner.read().current_version()
    }

    /// See [`MultiVersionMap::len`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// See [`MultiVersionMap::is_empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

fn owned<K: Clone, P: Clone>(entries: Vec<(&K, &P)>) -> Vec<(K, P)> {
    entries
        .into_iter()
        .map(|(key, payload)| (key.clone(), payload.clone()))
        .collect()
}
