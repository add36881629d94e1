//! Plain version chain.

use crate::{Backing, Version, VersionList, VersionResult, check_monotonic};

/// Versions in append order; lookups scan backwards from the newest.
///
/// O(1) append, O(n) worst-case lookup.
#[derive(Debug)]
pub struct VersionChain<P> {
    versions: Vec<(Version, P)>,
    backing: Backing<P>,
}

impl<P> VersionChain<P> {
    /// Create an empty chain.
    #[must_use]
    pub const fn new(backing: Backing<P>) -> Self {
        Self {
            versions: Vec::new(),
            backing,
        }
    }

    /// The persistence backing of this chain.
    #[must_use]
    pub const fn backing(&self) -> &Backing<P> {
        &self.backing
    }
}

impl<P> VersionList<P> for VersionChain<P> {
    fn append(&mut self, payload: P, timestamp: Version) -> VersionResult<()> {
        check_monotonic(self.latest_timestamp(), timestamp)?;

        self.backing.persist(timestamp, &payload);
        self.versions.push((timestamp, payload));
        Ok(())
    }

    fn find_visible(&self, timestamp: Version) -> Option<&P> {
        self.versions
            .iter()
            .rev()
            .find(|(version, _)| *version <= timestamp)
            .map(|(_, payload)| payload)
    }

    fn len(&self) -> usize {
        self.versions.len()
    }

    fn latest_timestamp(&self) -> Option<Version> {
        self.versions.last().map(|(version, _)| *version)
    }
}
