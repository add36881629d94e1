//! Persistence façade for weave.
//!
//! The temporal index keeps every version in memory and answers all reads
//! from there. This crate is the side-channel it writes through:
//!
//! - [`KvStore`]: a string-keyed put/get store, keyed by the stringified
//!   version timestamp
//! - [`Serializer`]: turns payloads into strings and back
//!
//! # Backends
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  MemoryStore   RwLock<HashMap<String, String>>               │
//! │  LmdbStore     heed environment, one Str → Str database      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use weave_store::{JsonSerializer, KvStore, MemoryStore, Serializer};
//!
//! let store = MemoryStore::new();
//! let serializer = JsonSerializer::<String>::new();
//!
//! store.put("1", &serializer.serialize(&"hello".to_owned())?)?;
//! let back = store.get("1")?.map(|s| serializer.deserialize(&s)).transpose()?;
//! ```

mod error;
mod lmdb;
mod memory;
mod serializer;

pub use error::{StoreError, StoreResult};
pub use lmdb::LmdbStore;
pub use memory::MemoryStore;
pub use serializer::{JsonSerializer, Serializer};

/// A string-keyed key-value store.
///
/// Writes are synchronous. Implementations must be shareable across threads
/// so a map wrapped in a lock can hand the same store to every list.
pub trait KvStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Load the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
}

/// A store that can drop all of its contents.
pub trait FlushableStore: KvStore {
    /// Remove every entry.
    fn flush(&self) -> StoreResult<()>;
}
