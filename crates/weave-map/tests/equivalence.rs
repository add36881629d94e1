//! Property tests: every list kind gives the same answers.

use proptest::prelude::*;
use weave_map::{MultiVersionMap, Version, VersionListKind};

fn build(kind: VersionListKind, keys: &[u8], seed: u64) -> MultiVersionMap<u8, usize> {
    let mut map = MultiVersionMap::builder().kind(kind).seed(seed).build();
    for (i, &key) in keys.iter().enumerate() {
        map.append(key, i).unwrap();
    }
    map
}

fn all_kinds(keys: &[u8], seed: u64) -> [MultiVersionMap<u8, usize>; 3] {
    VersionListKind::ALL.map(|kind| build(kind, keys, seed))
}

proptest! {
    #[test]
    fn prop_get_agrees(keys in prop::collection::vec(0u8..16, 1..200), seed in any::<u64>()) {
        let maps = all_kinds(&keys, seed);
        let last = keys.len() as Version;

        for key in 0..16u8 {
            for t in 0..=last + 1 {
                let expected = maps[0].get(&key, t);
                for map in &maps[1..] {
                    prop_assert_eq!(
                        map.get(&key, t),
                        expected,
                        "{} key {} at {}",
                        map.kind(),
                        key,
                        t
                    );
                }
            }
        }
    }

    #[test]
    fn prop_versions_are_sequential(keys in prop::collection::vec(any::<u8>(), 0..100)) {
        let mut map = MultiVersionMap::new(VersionListKind::Woven);
        for (i, key) in keys.into_iter().enumerate() {
            prop_assert_eq!(map.append(key, ()).unwrap(), i as Version + 1);
        }
    }

    #[test]
    fn prop_snapshot_agrees(
        keys in prop::collection::vec(0u8..32, 0..200),
        seed in any::<u64>(),
        t in 0u64..220,
    ) {
        let maps = all_kinds(&keys, seed);
        let expected = maps[0].snapshot(t);

        // Newest append at or before t, per key.
        let mut naive: Vec<(u8, usize)> = Vec::new();
        for (i, &key) in keys.iter().enumerate().take(t as usize) {
            match naive.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = i,
                None => naive.push((key, i)),
            }
        }
        naive.sort_unstable();
        let flattened: Vec<_> = expected.iter().map(|(k, p)| (**k, **p)).collect();
        prop_assert_eq!(flattened, naive);

        for map in &maps[1..] {
            prop_assert_eq!(map.snapshot(t), expected.clone());
        }
    }

    #[test]
    fn prop_range_scan_transparent(
        keys in prop::collection::vec(0u8..32, 1..300),
        seed in any::<u64>(),
        from in 0u8..32,
        span in 0u8..32,
        from_inclusive in any::<bool>(),
        to_inclusive in any::<bool>(),
        t in 0u64..320,
    ) {
        let maps = all_kinds(&keys, seed);
        let to = from.saturating_add(span);

        let expected = maps[0]
            .range_snapshot(&from, from_inclusive, &to, to_inclusive, t)
            .unwrap();
        let filtered: Vec<_> = maps[0]
            .snapshot(t)
            .into_iter()
            .filter(|(key, _)| {
                (if from_inclusive { **key >= from } else { **key > from })
                    && (if to_inclusive { **key <= to } else { **key < to })
            })
            .collect();
        prop_assert_eq!(&expected, &filtered);

        for map in &maps[1..] {
            let (got, stats) = map
                .range_snapshot_with_stats(&from, from_inclusive, &to, to_inclusive, t)
                .unwrap();
            prop_assert_eq!(&got, &expected);
            prop_assert!(stats.link_hits + stats.link_misses <= stats.keys_visited);
        }
    }
}
