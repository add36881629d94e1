//! Frugal skip list.
//!
//! A newest-first chain where each node carries exactly one extra "ridgy"
//! pointer to an older node. Instead of drawing an independent height per
//! node, a node's level is inherited from its predecessor:
//!
//! ```text
//! level(new) = level(head) + 1   with probability 1/2
//!            = 0                 otherwise
//! ```
//!
//! The ridgy pointer targets the first node reachable from the old head (by
//! ridgy hops) whose level is at least the new node's level. Lookups hop
//! along ridgy pointers while the target is still too new, and fall back to
//! the plain chain link otherwise. Expected search cost is logarithmic with
//! one pointer of overhead per node.

use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

use crate::{Backing, NodeId, Version, VersionError, VersionList, VersionResult, check_monotonic};

struct SkipNode<P> {
    timestamp: Version,
    payload: P,
    level: u32,
    ridgy: Option<NodeId>,
}

/// A version list with frugal skip pointers.
pub struct FrugalSkipList<P> {
    /// Arena, oldest first. `nodes[i - 1]` is the chain link of `nodes[i]`.
    nodes: Vec<SkipNode<P>>,
    rng: StdRng,
    backing: Backing<P>,
}

impl<P> std::fmt::Debug for FrugalSkipList<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrugalSkipList")
            .field("len", &self.nodes.len())
            .field("backing", &self.backing)
            .finish_non_exhaustive()
    }
}

impl<P> FrugalSkipList<P> {
    /// Create an empty list seeded from OS entropy.
    #[must_use]
    pub fn new(backing: Backing<P>) -> Self {
        Self::from_rng(backing, StdRng::from_entropy())
    }

    /// Create an empty list with a deterministic level sequence.
    #[must_use]
    pub fn with_seed(backing: Backing<P>, seed: u64) -> Self {
        Self::from_rng(backing, StdRng::seed_from_u64(seed))
    }

    fn from_rng(backing: Backing<P>, rng: StdRng) -> Self {
        Self {
            nodes: Vec::new(),
            rng,
            backing,
        }
    }

    /// The persistence backing of this list.
    #[must_use]
    pub const fn backing(&self) -> &Backing<P> {
        &self.backing
    }

    /// The newest node.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.nodes.len().checked_sub(1).and_then(NodeId::for_index)
    }

    /// Timestamp of `node`, if it exists.
    #[must_use]
    pub fn timestamp(&self, node: NodeId) -> Option<Version> {
        self.nodes.get(node.index()).map(|n| n.timestamp)
    }

    /// Payload of `node`, if it exists.
    #[must_use]
    pub fn payload(&self, node: NodeId) -> Option<&P> {
        self.nodes.get(node.index()).map(|n| &n.payload)
    }

    /// Level of `node`, if it exists.
    #[must_use]
    pub fn level(&self, node: NodeId) -> Option<u32> {
        self.nodes.get(node.index()).map(|n| n.level)
    }

    /// Ridgy target of `node`.
    #[must_use]
    pub fn ridgy(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index()).and_then(|n| n.ridgy)
    }

    /// The node visible at `timestamp`: the newest one with a timestamp
    /// `<= timestamp`.
    #[must_use]
    pub fn find_visible_node(&self, timestamp: Version) -> Option<NodeId> {
        let mut cursor = self.head()?;

        loop {
            let node = &self.nodes[cursor.index()];
            if node.timestamp <= timestamp {
                return Some(cursor);
            }

            cursor = match node.ridgy {
                Some(ridgy) if self.nodes[ridgy.index()].timestamp > timestamp => ridgy,
                _ => cursor.older()?,
            };
        }
    }

    fn next_level(&mut self, head: Option<NodeId>) -> u32 {
        match head {
            Some(head) if self.rng.gen_bool(0.5) => {
                self.nodes[head.index()].level.saturating_add(1)
            }
            _ => 0,
        }
    }

    fn ridgy_target(&self, head: Option<NodeId>, level: u32) -> Option<NodeId> {
        let mut cursor = head;
        while let Some(id) = cursor {
            let node = &self.nodes[id.index()];
            if node.level >= level {
                break;
            }
            cursor = node.ridgy;
        }
        cursor
    }
}

impl<P> VersionList<P> for FrugalSkipList<P> {
    fn append(&mut self, payload: P, timestamp: Version) -> VersionResult<()> {
        check_monotonic(self.latest_timestamp(), timestamp)?;
        if NodeId::for_index(self.nodes.len()).is_none() {
            return Err(VersionError::Full);
        }

        let head = self.head();
        let level = self.next_level(head);
        let ridgy = self.ridgy_target(head, level);

        self.backing.persist(timestamp, &payload);
        self.nodes.push(SkipNode {
            timestamp,
            payload,
            level,
            ridgy,
        });
        Ok(())
    }

    fn find_visible(&self, timestamp: Version) -> Option<&P> {
        self.find_visible_node(timestamp)
            .map(|id| &self.nodes[id.index()].payload)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn latest_timestamp(&self) -> Option<Version> {
        self.nodes.last().map(|n| n.timestamp)
    }
}
