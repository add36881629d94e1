//! Closed set of version list variants.

use std::{fmt, str::FromStr};

use crate::{
    Backing, FrugalSkipList, ListId, Version, VersionChain, VersionList, VersionResult,
    WovenSkipList,
};

/// Which structure backs each key of a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum VersionListKind {
    /// [`VersionChain`].
    Chain,
    /// [`FrugalSkipList`].
    FrugalSkip,
    /// [`WovenSkipList`], enabling cross-key range scans.
    #[default]
    Woven,
}

impl VersionListKind {
    /// All variants.
    pub const ALL: [Self; 3] = [Self::Chain, Self::FrugalSkip, Self::Woven];

    /// Short name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Chain => "chain",
            Self::FrugalSkip => "frugal",
            Self::Woven => "woven",
        }
    }

    /// Create an empty list of this kind.
    ///
    /// `id` and `seed` are only used by the skip variants.
    #[must_use]
    pub fn create<P>(self, id: ListId, backing: Backing<P>, seed: u64) -> AnyVersionList<P> {
        match self {
            Self::Chain => AnyVersionList::Chain(VersionChain::new(backing)),
            Self::FrugalSkip => {
                AnyVersionList::FrugalSkip(FrugalSkipList::with_seed(backing, seed))
            }
            Self::Woven => AnyVersionList::Woven(WovenSkipList::with_seed(id, backing, seed)),
        }
    }
}

impl fmt::Display for VersionListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised [`VersionListKind`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown version list kind: {0} (expected chain, frugal or woven)")]
pub struct UnknownKind(pub String);

impl FromStr for VersionListKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chain" => Ok(Self::Chain),
            "frugal" | "frugal-skip" => Ok(Self::FrugalSkip),
            "woven" => Ok(Self::Woven),
            _ => Err(UnknownKind(s.to_owned())),
        }
    }
}

/// A version list of any kind.
#[derive(Debug)]
pub enum AnyVersionList<P> {
    /// Plain chain.
    Chain(VersionChain<P>),
    /// Frugal skip list.
    FrugalSkip(FrugalSkipList<P>),
    /// Frugal skip list with cross-key links.
    Woven(WovenSkipList<P>),
}

impl<P> AnyVersionList<P> {
    /// The kind of this list.
    #[must_use]
    pub const fn kind(&self) -> VersionListKind {
        match self {
            Self::Chain(_) => VersionListKind::Chain,
            Self::FrugalSkip(_) => VersionListKind::FrugalSkip,
            Self::Woven(_) => VersionListKind::Woven,
        }
    }

    /// The list as a woven list, if it is one.
    #[must_use]
    pub const fn as_woven(&self) -> Option<&WovenSkipList<P>> {
        match self {
            Self::Woven(list) => Some(list),
            _ => None,
        }
    }

    /// The list as a mutable woven list, if it is one.
    #[must_use]
    pub fn as_woven_mut(&mut self) -> Option<&mut WovenSkipList<P>> {
        match self {
            Self::Woven(list) => Some(list),
            _ => None,
        }
    }

    /// The persistence backing of this list.
    #[must_use]
    pub const fn backing(&self) -> &Backing<P> {
        match self {
            Self::Chain(list) => list.backing(),
            Self::FrugalSkip(list) => list.backing(),
            Self::Woven(list) => list.inner().backing(),
        }
    }
}

impl<P> VersionList<P> for AnyVersionList<P> {
    fn append(&mut self, payload: P, timestamp: Version) -> VersionResult<()> {
        match self {
            Self::Chain(list) => list.append(payload, timestamp),
            Self::FrugalSkip(list) => list.append(payload, timestamp),
            Self::Woven(list) => list.append(payload, timestamp),
        }
    }

    fn find_visible(&self, timestamp: Version) -> Option<&P> {
        match self {
            Self::Chain(list) => list.find_visible(timestamp),
            Self::FrugalSkip(list) => list.find_visible(timestamp),
            Self::Woven(list) => list.find_visible(timestamp),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Chain(list) => list.len(),
            Self::FrugalSkip(list) => list.len(),
            Self::Woven(list) => list.len(),
        }
    }

    fn latest_timestamp(&self) -> Option<Version> {
        match self {
            Self::Chain(list) => list.latest_timestamp(),
            Self::FrugalSkip(list) => list.latest_timestamp(),
            Self::Woven(list) => list.latest_timestamp(),
        }
    }
}
