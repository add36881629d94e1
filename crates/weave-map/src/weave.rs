//! Cross-key link maintenance and link-assisted scans.
//!
//! After an append to key `k` at version `v`:
//!
//! 1. `k`'s head links to the node visible at `v` in the next key
//! 2. the previous key's head links to `k`'s node visible at `v`
//!
//! A scan then hops from each key's visible node to the next key through its
//! link, falling back to a search when the link is missing or stale.

use std::ops::Bound;

use weave_version::{AnyVersionList, CrossLink, Version, VersionList as _};

use crate::MultiVersionMap;

/// Counters gathered during one scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Keys in scope.
    pub keys_visited: usize,
    /// Keys resolved through a valid cross-key link.
    pub link_hits: usize,
    /// Woven keys after the first that still needed a search.
    pub link_misses: usize,
}

impl ScanStats {
    /// Fraction of linkable keys resolved through a link, or `None` if no
    /// key could have used one.
    #[must_use]
    pub fn hit_rate(&self) -> Option<f64> {
        let attempts = self.link_hits + self.link_misses;
        (attempts > 0).then(|| self.link_hits as f64 / attempts as f64)
    }
}

impl<K: Ord + Clone, P> MultiVersionMap<K, P> {
    /// Relink `key` with its neighbours after appending `version` to it.
    pub(crate) fn weave(&mut self, key: &K, version: Version) {
        let next = self
            .lists
            .range::<K, _>((Bound::Excluded(key), Bound::Unbounded))
            .next()
            .and_then(|(_, list)| list.as_woven())
            .and_then(|list| list.link_to_visible(version));

        let Some(list) = self
            .lists
            .get_mut(key)
            .and_then(AnyVersionList::as_woven_mut)
        else {
            return;
        };
        let Some(head) = list.head() else {
            return;
        };
        list.set_cross_link(head, next);
        let own = list.link_to_visible(version);

        let prev = self
            .lists
            .range_mut::<K, _>((Bound::Unbounded, Bound::Excluded(key)))
            .next_back()
            .and_then(|(_, list)| list.as_woven_mut());

        let linked_prev = prev.is_some_and(|prev| {
            prev.head()
                .is_some_and(|prev_head| prev.set_cross_link(prev_head, own))
        });

        tracing::trace!(
            "Wove version {version}: next list {:?}, prev linked {linked_prev}",
            next.map(|link| link.list.get()),
        );
    }

    /// Resolve the visible payload of every list in `entries`, in order.
    pub(crate) fn scan<'a, I>(entries: I, timestamp: Version) -> (Vec<(&'a K, &'a P)>, ScanStats)
    where
        I: Iterator<Item = (&'a K, &'a AnyVersionList<P>)>,
    {
        let mut visible = Vec::new();
        let mut stats = ScanStats::default();
        // Link taken from the previous key's visible node.
        let mut carried: Option<CrossLink> = None;
        let mut first = true;

        for (key, list) in entries {
            stats.keys_visited += 1;

            let AnyVersionList::Woven(list) = list else {
                if let Some(payload) = list.find_visible(timestamp) {
                    visible.push((key, payload));
                }
                continue;
            };

            let (node, hit) = list.resolve_visible(carried, timestamp);
            if hit {
                stats.link_hits += 1;
            } else if !first {
                stats.link_misses += 1;
            }
            first = false;

            carried = node.and_then(|node| list.cross_link(node));
            if let Some(payload) = node.and_then(|node| list.payload(node)) {
                visible.push((key, payload));
            }
        }

        (visible, stats)
    }
}
