//! The `test` command.

use eyre::{WrapErr as _, ensure};
use tracing::info;
use weave_map::{Version, VersionListKind};

use crate::{
    config::{RunnerConfig, Store},
    data::{self, Payload},
    millis, populate,
};

const FROM: &str = "KEY002";
const TO: &str = "KEY004";
const AT: Version = 20;

/// Range-snapshot the test data with every kind and check they agree.
pub fn run(config: &RunnerConfig, store: &Store) -> eyre::Result<()> {
    info!("=== Running test with test_data.csv ===");
    let data = data::load_or_generate(&config.data_dir.join("test_data.csv"), 25, 5, config.seed)?;

    let mut results: Vec<(VersionListKind, Vec<(String, Payload)>)> = Vec::new();

    for kind in VersionListKind::ALL {
        info!("--- Testing with {kind} lists ---");
        store.flush().wrap_err("flushing store")?;

        let (map, elapsed) = populate(kind, &data, store, config.seed)?;
        info!("Insertion time: {:.3} ms", millis(elapsed));

        if let Some((_, last)) = data.last() {
            let persisted = map
                .load_persisted(map.current_version())
                .wrap_err("reading back newest version")?;
            ensure!(
                persisted.as_ref() == Some(last),
                "{kind}: store holds {persisted:?} for version {}",
                map.current_version()
            );
        }

        info!("Range snapshot [{FROM}, {TO}] at timestamp {AT}:");
        let range: Vec<_> = map
            .range_snapshot(&FROM.to_owned(), true, &TO.to_owned(), true, AT)?
            .into_iter()
            .map(|(key, payload)| (key.clone(), payload.clone()))
            .collect();
        for (key, payload) in &range {
            info!("{key}={payload}");
        }

        results.push((kind, range));
    }

    store.flush().wrap_err("flushing store")?;

    if let Some(((first_kind, expected), rest)) = results.split_first() {
        for (kind, range) in rest {
            ensure!(range == expected, "{kind} disagrees with {first_kind}");
        }
    }

    info!("All list kinds agree");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_bundled_data_expected_range() {
        let data = data::load_or_generate(
            &std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/test_data.csv"),
            0,
            1,
            None,
        )
        .unwrap();
        let store = Store::Memory(Arc::default());

        for kind in VersionListKind::ALL {
            let (map, _) = populate(kind, &data, &store, Some(1)).unwrap();
            let range = map
                .range_snapshot(&FROM.to_owned(), true, &TO.to_owned(), true, AT)
                .unwrap();

            let comments: Vec<_> = range
                .iter()
                .map(|(_, payload)| (payload.comment.as_str(), payload.timestamp.as_str()))
                .collect();
            assert_eq!(
                comments,
                vec![
                    ("Change 3 for key KEY002", "19"),
                    ("Change 4 for key KEY003", "20"),
                    ("Change 3 for key KEY004", "13"),
                ],
                "{kind}"
            );
        }
    }

    #[test]
    fn test_run_with_missing_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig {
            data_dir: dir.path().to_owned(),
            seed: Some(2),
            ..RunnerConfig::default()
        };
        let store = config.open_store().unwrap();
        run(&config, &store).unwrap();
    }
}
