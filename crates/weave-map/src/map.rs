//! The multi-version map.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    marker::PhantomData,
    ops::Bound,
    sync::Arc,
};

use rand::{RngCore as _, SeedableRng as _, rngs::StdRng};
use weave_store::{KvStore, Serializer, StoreResult};
use weave_version::{AnyVersionList, Backing, ListId, Version, VersionList, VersionListKind};

use crate::{MapError, MapResult, ScanStats};

/// A key-ordered map from keys to version lists with a shared version
/// counter.
///
/// Not thread-safe: appends bump the counter and rewrite neighbour links
/// without synchronization. See [`SharedMap`](crate::SharedMap).
pub struct MultiVersionMap<K, P> {
    pub(crate) lists: BTreeMap<K, AnyVersionList<P>>,
    kind: VersionListKind,
    backing: Backing<P>,
    /// Last issued version (0 before the first append).
    version: Version,
    next_list_id: u64,
    /// Seeds the level sequence of each new skip list.
    seeds: StdRng,
}

impl<K, P> std::fmt::Debug for MultiVersionMap<K, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiVersionMap")
            .field("kind", &self.kind)
            .field("keys", &self.lists.len())
            .field("version", &self.version)
            .field("backing", &self.backing)
            .finish_non_exhaustive()
    }
}

/// Builder for [`MultiVersionMap`].
pub struct MapBuilder<K, P> {
    kind: VersionListKind,
    backing: Backing<P>,
    seed: Option<u64>,
    _keys: PhantomData<fn() -> K>,
}

impl<K, P> Default for MapBuilder<K, P> {
    fn default() -> Self {
        Self {
            kind: VersionListKind::default(),
            backing: Backing::detached(),
            seed: None,
            _keys: PhantomData,
        }
    }
}

impl<K, P> std::fmt::Debug for MapBuilder<K, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapBuilder")
            .field("kind", &self.kind)
            .field("backing", &self.backing)
            .field("seed", &self.seed)
            .finish()
    }
}

impl<K, P> MapBuilder<K, P> {
    /// Start a builder: woven lists, no persistence, entropy seed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Variant used for every key's version list.
    #[must_use]
    pub fn kind(mut self, kind: VersionListKind) -> Self {
        self.kind = kind;
        self
    }

    /// Pass every appended payload through to `store`.
    #[must_use]
    pub fn persist_to(
        mut self,
        store: Arc<dyn KvStore>,
        serializer: Arc<dyn Serializer<P>>,
    ) -> Self {
        self.backing = Backing::new(store, serializer);
        self
    }

    /// Make skip list levels reproducible.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build an empty map.
    #[must_use]
    pub fn build(self) -> MultiVersionMap<K, P> {
        let seeds = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::debug!(
            "Created {} map (persistent: {})",
            self.kind,
            !self.backing.is_detached()
        );

        MultiVersionMap {
            lists: BTreeMap::new(),
            kind: self.kind,
            backing: self.backing,
            version: 0,
            next_list_id: 0,
            seeds,
        }
    }
}

impl<K: Ord + Clone, P> MultiVersionMap<K, P> {
    /// Create an in-memory map whose keys use `kind` lists.
    #[must_use]
    pub fn new(kind: VersionListKind) -> Self {
        MapBuilder::new().kind(kind).build()
    }

    /// Start a [`MapBuilder`].
    #[must_use]
    pub fn builder() -> MapBuilder<K, P> {
        MapBuilder::new()
    }

    /// Variant backing every key.
    #[must_use]
    pub const fn kind(&self) -> VersionListKind {
        self.kind
    }

    /// Last version issued, or 0 if nothing was appended.
    #[must_use]
    pub const fn current_version(&self) -> Version {
        self.version
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Check if no key was appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Check if `key` has a version list.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.lists.contains_key(key)
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.lists.keys()
    }

    /// Number of versions stored for `key`.
    #[must_use]
    pub fn version_count(&self, key: &K) -> usize {
        self.lists.get(key).map_or(0, VersionList::len)
    }

    /// Append `payload` as the newest version of `key`.
    ///
    /// Returns the version assigned to it, which is valid as a query
    /// timestamp right away.
    pub fn append(&mut self, key: K, payload: P) -> MapResult<Version> {
        let version = self
            .version
            .checked_add(1)
            .ok_or(MapError::VersionsExhausted)?;

        let list = match self.lists.entry(key.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let id = ListId::new(self.next_list_id);
                self.next_list_id += 1;

                tracing::debug!(
                    "Creating {} list {} at version {version}",
                    self.kind,
                    id.get()
                );
                entry.insert(
                    self.kind
                        .create(id, self.backing.clone(), self.seeds.next_u64()),
                )
            }
        };

        list.append(payload, version)?;
        self.version = version;

        self.weave(&key, version);
        Ok(version)
    }

    /// The payload of `key` visible at `timestamp`.
    #[must_use]
    pub fn get(&self, key: &K, timestamp: Version) -> Option<(&K, &P)> {
        let (key, list) = self.lists.get_key_value(key)?;
        list.find_visible(timestamp).map(|payload| (key, payload))
    }

    /// Every key with a version visible at `timestamp`, in key order.
    #[must_use]
    pub fn snapshot(&self, timestamp: Version) -> Vec<(&K, &P)> {
        Self::scan(self.lists.iter(), timestamp).0
    }

    /// Every key in the given range with a version visible at `timestamp`,
    /// in key order.
    ///
    /// Fails with [`MapError::InvalidRange`] if `from` sorts after `to`.
    pub fn range_snapshot(
        &self,
        from: &K,
        from_inclusive: bool,
        to: &K,
        to_inclusive: bool,
        timestamp: Version,
    ) -> MapResult<Vec<(&K, &P)>> {
        self.range_snapshot_with_stats(from, from_inclusive, to, to_inclusive, timestamp)
            .map(|(entries, _)| entries)
    }

    /// [`range_snapshot`](Self::range_snapshot), also reporting how often
    /// cross-key links replaced a search.
    pub fn range_snapshot_with_stats(
        &self,
        from: &K,
        from_inclusive: bool,
        to: &K,
        to_inclusive: bool,
        timestamp: Version,
    ) -> MapResult<(Vec<(&K, &P)>, ScanStats)> {
        let Some(bounds) = range_bounds(from, from_inclusive, to, to_inclusive)? else {
            return Ok((Vec::new(), ScanStats::default()));
        };

        let (entries, stats) = Self::scan(self.lists.range::<K, _>(bounds), timestamp);
        tracing::debug!(
            "Range scan at {timestamp}: {} keys, {} link hits, {} misses",
            stats.keys_visited,
            stats.link_hits,
            stats.link_misses
        );
        Ok((entries, stats))
    }

    /// Read the payload persisted for `version` back from the store.
    ///
    /// Only the persistence side-channel is consulted; `Ok(None)` for a
    /// map without a store.
    pub fn load_persisted(&self, version: Version) -> StoreResult<Option<P>> {
        self.backing.load(version)
    }
}

fn bound<K>(key: &K, inclusive: bool) -> Bound<&K> {
    if inclusive {
        Bound::Included(key)
    } else {
        Bound::Excluded(key)
    }
}

type Bounds<'k, K> = (Bound<&'k K>, Bound<&'k K>);

/// Validate a key range. `Ok(None)` means the range is well-formed but empty.
fn range_bounds<'k, K: Ord>(
    from: &'k K,
    from_inclusive: bool,
    to: &'k K,
    to_inclusive: bool,
) -> MapResult<Option<Bounds<'k, K>>> {
    match from.cmp(to) {
        std::cmp::Ordering::Greater => Err(MapError::InvalidRange),
        std::cmp::Ordering::Equal if !(from_inclusive && to_inclusive) => Ok(None),
        _ => Ok(Some((bound(from, from_inclusive), bound(to, to_inclusive)))),
    }
}
