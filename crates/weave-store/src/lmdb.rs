//! LMDB-backed store.

use std::path::Path;

use heed::{Database, Env, EnvOpenOptions, types::Str};

use crate::{FlushableStore, KvStore, StoreResult};

/// Name of the single database inside the environment.
const DB_NAME: &str = "versions";

/// A [`KvStore`] persisted in an LMDB environment.
///
/// Each `put` runs in its own write transaction, so a value is durable once
/// the call returns.
pub struct LmdbStore {
    env: Env,
    db: Database<Str, Str>,
}

impl std::fmt::Debug for LmdbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LmdbStore")
            .field("path", &self.env.path())
            .finish_non_exhaustive()
    }
}

impl LmdbStore {
    /// Open or create a store in the directory at `path`.
    ///
    /// # Errors
    /// Returns an error if the directory or the environment cannot be created.
    ///
    /// # Safety
    /// Uses unsafe to call heed's open method which requires ensuring
    /// the environment is not opened multiple times with different options.
    #[allow(unsafe_code)]
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        // SAFETY: each store owns its directory; callers open it once
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(1024 * 1024 * 1024) // 1GB max
                .max_dbs(1)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let db = env.create_database(&mut wtxn, Some(DB_NAME))?;
        wtxn.commit()?;

        tracing::debug!("Opened LMDB store at {}", path.display());
        Ok(Self { env, db })
    }

    /// Number of stored entries.
    pub fn len(&self) -> StoreResult<u64> {
        let rtxn = self.env.read_txn()?;
        Ok(self.db.len(&rtxn)?)
    }

    /// Check if the store holds no entries.
    pub fn is_empty(&self) -> StoreResult<bool> {
        let rtxn = self.env.read_txn()?;
        Ok(self.db.is_empty(&rtxn)?)
    }
}

impl KvStore for LmdbStore {
    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn()?;
        self.db.put(&mut wtxn, key, value)?;
        wtxn.commit()?;

        tracing::trace!("Persisted version {key}");
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let rtxn = self.env.read_txn()?;
        Ok(self.db.get(&rtxn, key)?.map(str::to_owned))
    }
}

impl FlushableStore for LmdbStore {
    fn flush(&self) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn()?;
        self.db.clear(&mut wtxn)?;
        wtxn.commit()?;

        tracing::debug!("Flushed LMDB store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();

        store.put("7", r#"{"title":"x"}"#).unwrap();
        assert_eq!(store.get("7").unwrap().as_deref(), Some(r#"{"title":"x"}"#));
        assert_eq!(store.get("8").unwrap(), None);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = LmdbStore::open(dir.path()).unwrap();
            store.put("1", "one").unwrap();
        }

        let store = LmdbStore::open(dir.path()).unwrap();
        assert_eq!(store.get("1").unwrap().as_deref(), Some("one"));
    }

    #[test]
    fn test_flush() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();

        store.put("1", "one").unwrap();
        store.put("2", "two").unwrap();
        assert_eq!(store.len().unwrap(), 2);
        assert!(!store.is_empty().unwrap());

        store.flush().unwrap();
        assert_eq!(store.len().unwrap(), 0);
        assert!(store.is_empty().unwrap());
        assert_eq!(store.get("1").unwrap(), None);
    }
}
