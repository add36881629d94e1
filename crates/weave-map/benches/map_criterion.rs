//! Map benchmarks using criterion for comparing list kinds.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use weave_map::{MultiVersionMap, VersionListKind};

const KEYS: u64 = 100;

/// `count` appends spread round-robin over `KEYS` keys.
fn populated(kind: VersionListKind, count: u64) -> MultiVersionMap<String, u64> {
    let mut map = MultiVersionMap::builder().kind(kind).seed(7).build();
    for i in 0..count {
        map.append(format!("KEY{:03}", i % KEYS), i).unwrap();
    }
    map
}

fn append_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for count in [1000, 10000] {
        group.throughput(Throughput::Elements(count));

        for kind in VersionListKind::ALL {
            group.bench_with_input(BenchmarkId::new(kind.name(), count), &count, |b, &count| {
                b.iter_batched(
                    || {
                        (0..count)
                            .map(|i| format!("KEY{:03}", i % KEYS))
                            .collect::<Vec<_>>()
                    },
                    |keys| {
                        let mut map = MultiVersionMap::builder().kind(kind).seed(7).build();
                        for (i, key) in keys.into_iter().enumerate() {
                            black_box(map.append(key, i).unwrap());
                        }
                        map
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group.finish();
}

fn get_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for count in [1000, 100_000] {
        for kind in VersionListKind::ALL {
            let map = populated(kind, count);
            let key = "KEY042".to_owned();

            group.bench_with_input(BenchmarkId::new(kind.name(), count), &count, |b, &count| {
                b.iter(|| black_box(map.get(&key, black_box(count / 3))));
            });
        }
    }

    group.finish();
}

fn snapshot_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    let count = 50_000;

    for kind in VersionListKind::ALL {
        let map = populated(kind, count);

        for t in [100, 10_000, 50_000] {
            group.bench_with_input(BenchmarkId::new(kind.name(), t), &t, |b, &t| {
                b.iter(|| black_box(map.snapshot(t)));
            });
        }
    }

    group.finish();
}

fn range_snapshot_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_snapshot");
    let count = 50_000;
    let from = "KEY000".to_owned();
    let to = "KEY009".to_owned();

    for kind in VersionListKind::ALL {
        let map = populated(kind, count);

        for t in [1_000, 49_990] {
            group.bench_with_input(BenchmarkId::new(kind.name(), t), &t, |b, &t| {
                b.iter(|| black_box(map.range_snapshot(&from, true, &to, true, t).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    append_benchmarks,
    get_benchmarks,
    snapshot_benchmarks,
    range_snapshot_benchmarks,
);

criterion_main!(benches);
