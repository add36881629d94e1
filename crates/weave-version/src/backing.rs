//! Persistence pass-through for version lists.
//!
//! Every successful append hands its payload to the backing, which writes it
//! to the store under the stringified timestamp. Failures are logged and
//! swallowed: the in-memory list is the source of truth and never waits on,
//! or rolls back because of, the store.

use std::sync::Arc;

use weave_store::{KvStore, Serializer, StoreResult};

use crate::Version;

/// Where a list persists its payloads, if anywhere.
pub struct Backing<P> {
    sink: Option<Sink<P>>,
}

struct Sink<P> {
    store: Arc<dyn KvStore>,
    serializer: Arc<dyn Serializer<P>>,
}

impl<P> Clone for Backing<P> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.as_ref().map(|sink| Sink {
                store: Arc::clone(&sink.store),
                serializer: Arc::clone(&sink.serializer),
            }),
        }
    }
}

impl<P> std::fmt::Debug for Backing<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backing")
            .field("detached", &self.is_detached())
            .finish()
    }
}

impl<P> Backing<P> {
    /// Persist through `store`, encoding payloads with `serializer`.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>, serializer: Arc<dyn Serializer<P>>) -> Self {
        Self {
            sink: Some(Sink { store, serializer }),
        }
    }

    /// Do not persist anything.
    #[must_use]
    pub const fn detached() -> Self {
        Self { sink: None }
    }

    /// Check if this backing drops every write.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.sink.is_none()
    }

    /// Best-effort write of `payload` under `timestamp`.
    pub fn persist(&self, timestamp: Version, payload: &P) {
        let Some(sink) = &self.sink else {
            return;
        };

        let key = timestamp.to_string();
        let encoded = match sink.serializer.serialize(payload) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!("Failed to serialize version {key}: {e}");
                return;
            }
        };

        match sink.store.put(&key, &encoded) {
            Ok(()) => tracing::trace!("Persisted version {key}"),
            Err(e) => tracing::warn!("Failed to persist version {key}: {e}"),
        }
    }

    /// Read back the payload persisted under `timestamp`.
    ///
    /// Returns `Ok(None)` for a detached backing or a missing entry.
    pub fn load(&self, timestamp: Version) -> StoreResult<Option<P>> {
        let Some(sink) = &self.sink else {
            return Ok(None);
        };

        sink.store
            .get(&timestamp.to_string())?
            .map(|encoded| sink.serializer.deserialize(&encoded))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use weave_store::{JsonSerializer, MemoryStore, StoreError};

    use super::*;

    struct FailingStore;

    impl KvStore for FailingStore {
        fn put(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::other("store offline")))
        }

        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Io(std::io::Error::other("store offline")))
        }
    }

    #[test]
    fn test_persist_and_load() {
        let store = Arc::new(MemoryStore::new());
        let backing =
            Backing::<String>::new(store.clone(), Arc::new(JsonSerializer::<String>::new()));

        backing.persist(42, &"hello".to_owned());

        assert_eq!(store.get("42").unwrap().as_deref(), Some(r#""hello""#));
        assert_eq!(backing.load(42).unwrap().as_deref(), Some("hello"));
        assert_eq!(backing.load(43).unwrap(), None);
    }

    #[test]
    fn test_detached_drops_writes() {
        let backing = Backing::<String>::detached();
        backing.persist(1, &"ignored".to_owned());

        assert!(backing.is_detached());
        assert_eq!(backing.load(1).unwrap(), None);
    }

    #[test]
    fn test_store_failure_is_swallowed() {
        let backing = Backing::<u32>::new(
            Arc::new(FailingStore),
            Arc::new(JsonSerializer::<u32>::new()),
        );

        // Must not panic or propagate.
        backing.persist(1, &7);
        assert!(backing.load(1).is_err());
    }
}
