//! The `bench` command.

use std::time::{Duration, Instant};

use eyre::WrapErr as _;
use tracing::{debug, info, warn};
use weave_map::{ScanStats, Version, VersionListKind};

use crate::{
    config::{RunnerConfig, Store},
    data::{self, Payload},
    millis, populate,
};

const TIMESTAMPS: [Version; 9] = [
    10, 100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000,
];

/// Synthetic dataset shape when `benchmark_data.csv` is missing.
const SYNTHETIC_ROWS: usize = 100_000;
const SYNTHETIC_KEYS: usize = 1_000;

/// Timings of one measured run.
#[derive(Debug, Default)]
struct RunTimes {
    insert: Duration,
    snapshots: Vec<Duration>,
    ranges: Vec<Duration>,
    /// Summed over every range query of the run.
    links: ScanStats,
}

/// Inclusive key range covering the first tenth of the distinct keys.
fn range_keys(data: &[(String, Payload)]) -> Option<(String, String)> {
    let mut keys: Vec<&str> = data.iter().map(|(key, _)| key.as_str()).collect();
    keys.sort_unstable();
    keys.dedup();

    let first = keys.first()?;
    let last = keys[(keys.len() / 10).max(1) - 1];
    Some(((*first).to_owned(), last.to_owned()))
}

/// Time inserts, full snapshots and range snapshots for every kind.
pub fn run(config: &RunnerConfig, store: &Store) -> eyre::Result<()> {
    info!("=== Running benchmark with benchmark_data.csv ===");
    let data = data::load_or_generate(
        &config.data_dir.join("benchmark_data.csv"),
        SYNTHETIC_ROWS,
        SYNTHETIC_KEYS,
        config.seed,
    )?;

    let Some(range) = range_keys(&data) else {
        warn!("Benchmark dataset is empty, nothing to do");
        return Ok(());
    };

    info!("Warmup runs: {}", config.warmup_runs);
    info!("Benchmark runs: {}", config.bench_runs);
    info!("Range: [{}, {}]", range.0, range.1);

    for kind in VersionListKind::ALL {
        info!("=== Benchmarking {kind} lists ===");

        for _ in 0..config.warmup_runs {
            measure(kind, &data, store, config.seed, &range)?;
        }

        let runs = (0..config.bench_runs)
            .map(|_| measure(kind, &data, store, config.seed, &range))
            .collect::<eyre::Result<Vec<_>>>()?;

        report(&runs);
    }

    store.flush().wrap_err("flushing store")?;
    Ok(())
}

fn measure(
    kind: VersionListKind,
    data: &[(String, Payload)],
    store: &Store,
    seed: Option<u64>,
    (from, to): &(String, String),
) -> eyre::Result<RunTimes> {
    store.flush().wrap_err("flushing store")?;
    let (map, insert) = populate(kind, data, store, seed)?;

    let mut times = RunTimes {
        insert,
        ..RunTimes::default()
    };

    for t in TIMESTAMPS {
        let start = Instant::now();
        let count = map.snapshot(t).len();
        let elapsed = start.elapsed();
        debug!(
            "Full snapshot at {t} returned {count} entries in {:.3} ms",
            millis(elapsed)
        );
        times.snapshots.push(elapsed);
    }

    for t in TIMESTAMPS {
        let start = Instant::now();
        let (entries, stats) = map.range_snapshot_with_stats(from, true, to, true, t)?;
        let elapsed = start.elapsed();
        debug!(
            "Range snapshot [{from}, {to}] at {t} returned {} entries in {:.3} ms",
            entries.len(),
            millis(elapsed)
        );
        times.ranges.push(elapsed);
        times.links.keys_visited += stats.keys_visited;
        times.links.link_hits += stats.link_hits;
        times.links.link_misses += stats.link_misses;
    }

    Ok(times)
}

fn average(durations: impl Iterator<Item = Duration>, runs: usize) -> Duration {
    durations.sum::<Duration>() / runs.max(1) as u32
}

fn report(runs: &[RunTimes]) {
    info!("--- Results (average of {} runs) ---", runs.len());
    info!(
        "Average insertion time: {:.2} ms",
        millis(average(runs.iter().map(|run| run.insert), runs.len()))
    );

    info!("Full snapshot query times:");
    for (i, t) in TIMESTAMPS.iter().enumerate() {
        let avg = average(runs.iter().map(|run| run.snapshots[i]), runs.len());
        info!("  Timestamp {t}: {:.3} ms", millis(avg));
    }

    info!("Range snapshot query times (first 10% of keys):");
    for (i, t) in TIMESTAMPS.iter().enumerate() {
        let avg = average(runs.iter().map(|run| run.ranges[i]), runs.len());
        info!("  Timestamp {t}: {:.3} ms", millis(avg));
    }

    if let Some(rate) = runs.last().and_then(|run| run.links.hit_rate()) {
        info!("Cross-key link hit rate: {:.1}%", rate * 100.0);
    }
}
