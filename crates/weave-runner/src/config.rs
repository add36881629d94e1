//! Runner configuration from environment variables.

use std::{path::PathBuf, str::FromStr, sync::Arc};

use eyre::{WrapErr as _, bail};
use weave_store::{FlushableStore, KvStore, LmdbStore, MemoryStore, StoreResult};

/// Which backend the maps persist through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Memory,
    Lmdb,
}

impl FromStr for StoreKind {
    type Err = eyre::Report;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "lmdb" => Ok(Self::Lmdb),
            _ => bail!("unknown store {s:?} (expected memory or lmdb)"),
        }
    }
}

/// Runner settings.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Directory holding `test_data.csv` and `benchmark_data.csv`.
    pub data_dir: PathBuf,
    pub store: StoreKind,
    /// LMDB directory, only used with [`StoreKind::Lmdb`].
    pub store_path: PathBuf,
    pub warmup_runs: usize,
    pub bench_runs: usize,
    /// Fixes skip list levels and synthetic data.
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            store: StoreKind::Memory,
            store_path: PathBuf::from("weave.lmdb"),
            warmup_runs: 3,
            bench_runs: 5,
            seed: None,
        }
    }
}

impl RunnerConfig {
    /// Read settings from `WEAVE_*` variables, falling back to defaults.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let defaults = Self::default();

        let store = match var("WEAVE_STORE") {
            Some(name) => name.parse().wrap_err("invalid WEAVE_STORE")?,
            None => defaults.store,
        };

        let seed = match var("WEAVE_SEED") {
            Some(seed) => Some(seed.parse().wrap_err("invalid WEAVE_SEED")?),
            None => None,
        };

        Ok(Self {
            data_dir: var("WEAVE_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            store,
            store_path: var("WEAVE_STORE_PATH").map_or(defaults.store_path, PathBuf::from),
            warmup_runs: var("WEAVE_WARMUP_RUNS")
                .and_then(|runs| runs.parse().ok())
                .unwrap_or(defaults.warmup_runs),
            bench_runs: var("WEAVE_BENCH_RUNS")
                .and_then(|runs| runs.parse().ok())
                .filter(|&runs| runs > 0)
                .unwrap_or(defaults.bench_runs),
            seed,
        })
    }

    /// Open the configured store.
    pub fn open_store(&self) -> eyre::Result<Store> {
        Ok(match self.store {
            StoreKind::Memory => Store::Memory(Arc::new(MemoryStore::new())),
            StoreKind::Lmdb => Store::Lmdb(Arc::new(
                LmdbStore::open(&self.store_path)
                    .wrap_err_with(|| format!("opening {}", self.store_path.display()))?,
            )),
        })
    }
}

/// An opened store, shared by every map the runner builds.
#[derive(Clone, Debug)]
pub enum Store {
    Memory(Arc<MemoryStore>),
    Lmdb(Arc<LmdbStore>),
}

impl Store {
    /// Handle for a map builder.
    pub fn kv(&self) -> Arc<dyn KvStore> {
        match self {
            Self::Memory(store) => store.clone(),
            Self::Lmdb(store) => store.clone(),
        }
    }

    /// Drop everything persisted by a previous run.
    pub fn flush(&self) -> StoreResult<()> {
        match self {
            Self::Memory(store) => store.flush(),
            Self::Lmdb(store) => store.flush(),
        }
    }
}
