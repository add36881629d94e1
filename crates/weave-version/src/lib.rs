//! Per-key version lists for weave.
//!
//! A version list holds every `(timestamp, payload)` pair ever appended to
//! one key and answers "which payload was current at time `t`?".
//!
//! # Variants
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  VersionChain     newest-first chain, O(1) append, O(n) lookup      │
//! │  FrugalSkipList   one ridgy pointer per node, expected O(log n)     │
//! │  WovenSkipList    FrugalSkipList + cross-key links set by the map   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Skip nodes live in an append-only arena addressed by [`NodeId`]. Since
//! appends arrive in timestamp order, node `i - 1` is always the next-older
//! version of node `i`.
//!
//! # Usage
//!
//! ```ignore
//! use weave_version::{Backing, ListId, VersionList, VersionListKind};
//!
//! let mut list = VersionListKind::FrugalSkip.create(ListId::new(0), Backing::detached(), 7);
//! list.append("a", 1)?;
//! list.append("b", 5)?;
//!
//! assert_eq!(list.find_visible(4), Some(&"a"));
//! assert_eq!(list.find_visible(0), None);
//! ```

mod backing;
mod chain;
mod error;
mod frugal;
mod kind;
mod woven;

pub use backing::Backing;
pub use chain::VersionChain;
pub use error::{VersionError, VersionResult};
pub use frugal::FrugalSkipList;
pub use kind::{AnyVersionList, UnknownKind, VersionListKind};
pub use woven::{CrossLink, WovenSkipList};

/// A logical timestamp. Doubles as the version identifier.
pub type Version = u64;

/// Index of a node inside one list's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Maximum number of nodes one list can hold.
    ///
    /// Kept one below the `u32` range so the newest node always has a
    /// representable [`newer`](Self::newer) neighbour.
    pub const CAPACITY: usize = u32::MAX as usize;

    /// ID for arena slot `index`, or `None` past [`CAPACITY`](Self::CAPACITY).
    #[inline]
    #[must_use]
    pub fn for_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .filter(|&raw| (raw as usize) < Self::CAPACITY)
            .map(Self)
    }

    /// Create a node ID from a raw arena index.
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw arena index.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }

    /// The next-older node in the same list.
    #[inline]
    #[must_use]
    pub const fn older(self) -> Option<Self> {
        match self.0.checked_sub(1) {
            Some(index) => Some(Self(index)),
            None => None,
        }
    }

    /// The next-newer node in the same list (may not exist yet).
    #[inline]
    #[must_use]
    pub const fn newer(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(index) => Some(Self(index)),
            None => None,
        }
    }
}

/// Identifier of a list, unique within the map that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListId(u64);

impl ListId {
    /// Create a list ID.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// An append-only, timestamp-ordered sequence of versions for one key.
pub trait VersionList<P> {
    /// Append `payload` as the version at `timestamp`.
    ///
    /// `timestamp` must be strictly greater than every timestamp already in
    /// the list; otherwise the list is left untouched and
    /// [`VersionError::NonMonotonic`] is returned.
    fn append(&mut self, payload: P, timestamp: Version) -> VersionResult<()>;

    /// Payload of the newest version with a timestamp `<= timestamp`.
    fn find_visible(&self, timestamp: Version) -> Option<&P>;

    /// Number of versions.
    fn len(&self) -> usize;

    /// Check if no version was appended yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Timestamp of the newest version.
    fn latest_timestamp(&self) -> Option<Version>;
}

/// Reject `attempted` unless it is after `last`.
#[inline]
pub(crate) fn check_monotonic(last: Option<Version>, attempted: Version) -> VersionResult<()> {
    match last {
        Some(last) if attempted <= last => Err(VersionError::NonMonotonic { last, attempted }),
        _ => Ok(()),
    }
}
