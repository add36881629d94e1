//! In-memory store.

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::{FlushableStore, KvStore, StoreResult};

/// A [`KvStore`] backed by a hash map behind a read-write lock.
///
/// Never fails. Useful for tests and for runs that only care about the
/// in-memory index.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }
}

impl FlushableStore for MemoryStore {
    fn flush(&self) -> StoreResult<()> {
        self.entries.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let store = MemoryStore::new();
        store.put("1", "one").unwrap();
        store.put("2", "two").unwrap();

        assert_eq!(store.get("1").unwrap().as_deref(), Some("one"));
        assert_eq!(store.get("2").unwrap().as_deref(), Some("two"));
        assert_eq!(store.get("3").unwrap(), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put("1", "old").unwrap();
        store.put("1", "new").unwrap();

        assert_eq!(store.get("1").unwrap().as_deref(), Some("new"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_flush() {
        let store = MemoryStore::new();
        store.put("1", "one").unwrap();
        store.flush().unwrap();

        assert!(store.is_empty());
        assert_eq!(store.get("1").unwrap(), None);
    }
}
