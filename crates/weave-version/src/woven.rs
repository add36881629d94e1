//! Frugal skip list with cross-key links.
//!
//! Same internal mechanics as [`FrugalSkipList`]; every node additionally
//! carries a [`CrossLink`] slot pointing into the list of the next key in key
//! order. The list never writes that slot itself. The owning map sets it on
//! each append and range scans follow it to avoid a fresh search per key.
//!
//! A link is only a hint: it records the node that *was* visible in the
//! neighbour list at the time it was set. Readers check it with
//! [`WovenSkipList::is_visible_at`] before trusting it.

use crate::{Backing, FrugalSkipList, ListId, NodeId, Version, VersionList, VersionResult};

/// A non-owning reference to a node of another list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CrossLink {
    /// List the node belongs to.
    pub list: ListId,
    /// Node within that list.
    pub node: NodeId,
}

/// A frugal skip list whose nodes can link across keys.
#[derive(Debug)]
pub struct WovenSkipList<P> {
    id: ListId,
    list: FrugalSkipList<P>,
    /// Parallel to the node arena.
    links: Vec<Option<CrossLink>>,
}

impl<P> WovenSkipList<P> {
    /// Create an empty list seeded from OS entropy.
    #[must_use]
    pub fn new(id: ListId, backing: Backing<P>) -> Self {
        Self::from_list(id, FrugalSkipList::new(backing))
    }

    /// Create an empty list with a deterministic level sequence.
    #[must_use]
    pub fn with_seed(id: ListId, backing: Backing<P>, seed: u64) -> Self {
        Self::from_list(id, FrugalSkipList::with_seed(backing, seed))
    }

    const fn from_list(id: ListId, list: FrugalSkipList<P>) -> Self {
        Self {
            id,
            list,
            links: Vec::new(),
        }
    }

    /// Identifier used by links pointing into this list.
    #[must_use]
    pub const fn id(&self) -> ListId {
        self.id
    }

    /// The newest node.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.list.head()
    }

    /// The node visible at `timestamp`.
    #[must_use]
    pub fn find_visible_node(&self, timestamp: Version) -> Option<NodeId> {
        self.list.find_visible_node(timestamp)
    }

    /// A link to the node visible at `timestamp`.
    #[must_use]
    pub fn link_to_visible(&self, timestamp: Version) -> Option<CrossLink> {
        self.find_visible_node(timestamp).map(|node| CrossLink {
            list: self.id,
            node,
        })
    }

    /// Check that `node` is exactly the node visible at `timestamp`.
    ///
    /// O(1): the node must be at or before `timestamp` and its newer
    /// neighbour, if any, after it.
    #[must_use]
    pub fn is_visible_at(&self, node: NodeId, timestamp: Version) -> bool {
        self.list.timestamp(node).is_some_and(|t| t <= timestamp)
            && node
                .newer()
                .and_then(|newer| self.list.timestamp(newer))
                .is_none_or(|t| t > timestamp)
    }

    /// Resolve the node visible at `timestamp`, trying `candidate` first.
    ///
    /// Returns the node and whether the candidate was usable.
    #[must_use]
    pub fn resolve_visible(
        &self,
        candidate: Option<CrossLink>,
        timestamp: Version,
    ) -> (Option<NodeId>, bool) {
        match candidate {
            Some(link) if link.list == self.id && self.is_visible_at(link.node, timestamp) => {
                (Some(link.node), true)
            }
            _ => (self.find_visible_node(timestamp), false),
        }
    }

    /// Payload of `node`.
    #[must_use]
    pub fn payload(&self, node: NodeId) -> Option<&P> {
        self.list.payload(node)
    }

    /// Timestamp of `node`.
    #[must_use]
    pub fn timestamp(&self, node: NodeId) -> Option<Version> {
        self.list.timestamp(node)
    }

    /// Cross-key link stored on `node`.
    #[must_use]
    pub fn cross_link(&self, node: NodeId) -> Option<CrossLink> {
        self.links.get(node.index()).copied().flatten()
    }

    /// Overwrite the cross-key link stored on `node`.
    ///
    /// Returns `false` if `node` does not exist.
    pub fn set_cross_link(&mut self, node: NodeId, link: Option<CrossLink>) -> bool {
        let Some(slot) = self.links.get_mut(node.index()) else {
            return false;
        };
        *slot = link;
        true
    }

    /// The underlying skip list.
    #[must_use]
    pub const fn inner(&self) -> &FrugalSkipList<P> {
        &self.list
    }
}

impl<P> VersionList<P> for WovenSkipList<P> {
    fn append(&mut self, payload: P, timestamp: Version) -> VersionResult<()> {
        self.list.append(payload, timestamp)?;
        self.links.push(None);
        Ok(())
    }

    fn find_visible(&self, timestamp: Version) -> Option<&P> {
        self.list.find_visible(timestamp)
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn latest_timestamp(&self) -> Option<Version> {
        self.list.latest_timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VersionError;

    fn woven(id: u64, timestamps: &[Version]) -> WovenSkipList<Version> {
        let mut list = WovenSkipList::with_seed(ListId::new(id), Backing::detached(), id);
        for &t in timestamps {
            list.append(t * 100, t).unwrap();
        }
        list
    }

    #[test]
    fn test_links_start_empty() {
        let list = woven(1, &[1, 2, 3]);
        for i in 0..3 {
            assert_eq!(list.cross_link(NodeId::from_raw(i)), None);
        }
        assert_eq!(list.cross_link(NodeId::from_raw(3)), None);
    }

    #[test]
    fn test_set_cross_link() {
        let mut list = woven(1, &[1, 2]);
        let link = CrossLink {
            list: ListId::new(9),
            node: NodeId::from_raw(4),
        };

        let head = list.head().unwrap();
        assert!(list.set_cross_link(head, Some(link)));
        assert_eq!(list.cross_link(head), Some(link));
        assert!(!list.set_cross_link(NodeId::from_raw(10), Some(link)));

        // Later appends do not disturb existing links.
        list.append(300, 3).unwrap();
        assert_eq!(list.cross_link(head), Some(link));
        assert_eq!(list.cross_link(list.head().unwrap()), None);
    }

    #[test]
    fn test_is_visible_at() {
        let list = woven(2, &[2, 5, 9]);
        let n2 = NodeId::from_raw(0);
        let n5 = NodeId::from_raw(1);
        let n9 = NodeId::from_raw(2);

        assert!(!list.is_visible_at(n2, 1));
        assert!(list.is_visible_at(n2, 2));
        assert!(list.is_visible_at(n2, 4));
        assert!(!list.is_visible_at(n2, 5));
        assert!(list.is_visible_at(n5, 8));
        assert!(!list.is_visible_at(n5, 9));
        assert!(list.is_visible_at(n9, 9));
        assert!(list.is_visible_at(n9, u64::MAX));
        assert!(!list.is_visible_at(NodeId::from_raw(3), 100));
    }

    #[test]
    fn test_resolve_visible() {
        let list = woven(3, &[2, 5, 9]);
        let fresh = CrossLink {
            list: list.id(),
            node: NodeId::from_raw(1),
        };
        let foreign = CrossLink {
            list: ListId::new(99),
            node: NodeId::from_raw(1),
        };

        assert_eq!(
            list.resolve_visible(Some(fresh), 6),
            (Some(NodeId::from_raw(1)), true)
        );
        // Stale: node 1 is no longer visible at 9.
        assert_eq!(
            list.resolve_visible(Some(fresh), 9),
            (Some(NodeId::from_raw(2)), false)
        );
        assert_eq!(
            list.resolve_visible(Some(foreign), 6),
            (Some(NodeId::from_raw(1)), false)
        );
        assert_eq!(list.resolve_visible(None, 1), (None, false));
    }

    #[test]
    fn test_rejects_non_monotonic() {
        let mut list = woven(5, &[2, 5, 9]);
        let link = CrossLink {
            list: ListId::new(6),
            node: NodeId::from_raw(0),
        };
        let head = list.head().unwrap();
        list.set_cross_link(head, Some(link));

        assert_eq!(
            list.append(0, 9),
            Err(VersionError::NonMonotonic {
                last: 9,
                attempted: 9
            })
        );
        assert_eq!(list.len(), 3);
        assert_eq!(list.links.len(), list.len());
        assert_eq!(list.head(), Some(head));
        assert_eq!(list.cross_link(head), Some(link));
        assert_eq!(list.find_visible(20), Some(&900));
    }

    #[test]
    fn test_visible_node_payload() {
        let list = woven(4, &[3, 7]);
        let node = list.find_visible_node(6).unwrap();
        assert_eq!(list.payload(node), Some(&300));
        assert_eq!(list.timestamp(node), Some(3));
        assert_eq!(list.find_visible(7), Some(&700));
        assert_eq!(
            list.link_to_visible(7),
            Some(CrossLink {
                list: ListId::new(4),
                node: NodeId::from_raw(1)
            })
        );
    }
}
