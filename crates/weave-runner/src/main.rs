//! Test and benchmark runner for weave multi-version maps
//!
//! This binary:
//! 1. Loads a CSV dataset from `WEAVE_DATA_DIR` (or generates one)
//! 2. Appends it into a map of every list kind, persisting through the
//!    configured store
//! 3. Checks range snapshots agree (`test`) or times inserts and snapshots
//!    (`bench`)
//!
//! Commands:
//! - `test` - Run the range snapshot check with `test_data.csv`
//! - `bench` - Run the benchmark with `benchmark_data.csv`
//! - `both` - Run both

use std::{
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use eyre::bail;
use tracing::info;
use weave_map::{MultiVersionMap, VersionListKind};
use weave_store::JsonSerializer;

use crate::{
    config::{RunnerConfig, Store},
    data::Payload,
};

mod bench;
mod check;
mod config;
mod data;

/// Commands accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Test,
    Bench,
    Both,
}

impl FromStr for Command {
    type Err = eyre::Report;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "bench" | "benchmark" => Ok(Self::Bench),
            "both" => Ok(Self::Both),
            _ => bail!("unknown command {s:?} (use test, bench or both)"),
        }
    }
}

fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("weave_runner=info".parse()?),
        )
        .init();

    let Some(command) = std::env::args().nth(1) else {
        info!("Usage: weave-runner [test|bench|both]");
        info!("  test  - range snapshot check with test_data.csv");
        info!("  bench - benchmark with benchmark_data.csv");
        info!("  both  - run both");
        return Ok(());
    };
    let command: Command = command.parse()?;

    let config = RunnerConfig::from_env()?;
    info!("Configuration: {:?}", config);

    let store = config.open_store()?;

    if matches!(command, Command::Test | Command::Both) {
        check::run(&config, &store)?;
    }
    if matches!(command, Command::Bench | Command::Both) {
        bench::run(&config, &store)?;
    }

    Ok(())
}

/// Append `data` in order into a fresh `kind` map persisting to `store`.
///
/// Returns the map and the time spent appending.
fn populate(
    kind: VersionListKind,
    data: &[(String, Payload)],
    store: &Store,
    seed: Option<u64>,
) -> eyre::Result<(MultiVersionMap<String, Payload>, Duration)> {
    let mut builder = MultiVersionMap::builder()
        .kind(kind)
        .persist_to(store.kv(), Arc::new(JsonSerializer::<Payload>::new()));
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let mut map = builder.build();

    let start = Instant::now();
    for (key, payload) in data {
        map.append(key.clone(), payload.clone())?;
    }

    Ok((map, start.elapsed()))
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
