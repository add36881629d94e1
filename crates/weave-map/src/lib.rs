//! Multi-version map with time-travel reads.
//!
//! Every key owns a version list. A single counter issues versions across
//! all keys, so any two appends are ordered and every returned version is
//! immediately usable as a query timestamp:
//!
//! - **get**: the payload of one key as of a timestamp
//! - **snapshot**: every key's payload as of a timestamp
//! - **range_snapshot**: the same, restricted to a key range
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  MultiVersionMap                                                    │
//! │    - BTreeMap<K, AnyVersionList<P>>, lists created on first append  │
//! │    - global version counter, starts at 1                            │
//! │    - woven lists: links each key's head to its neighbours           │
//! └─────────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Version lists (chain / frugal skip / woven skip)                   │
//! │    - answer "newest version <= t" per key                           │
//! │    - pass each payload through to the KvStore, keyed by version     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With woven lists, a range scan carries a cross-key link from one key's
//! visible node to the next key. A link that is still valid for the query
//! timestamp replaces that key's search; a stale one costs a normal search.
//! Results never depend on link freshness.
//!
//! # Usage
//!
//! ```ignore
//! use weave_map::MultiVersionMap;
//! use weave_version::VersionListKind;
//!
//! let mut map = MultiVersionMap::new(VersionListKind::Woven);
//!
//! let v1 = map.append("A", "p1")?; // 1
//! let v2 = map.append("B", "p2")?; // 2
//! let v3 = map.append("A", "p3")?; // 3
//!
//! assert_eq!(map.get(&"A", v2), Some((&"A", &"p1")));
//! assert_eq!(map.snapshot(v2), vec![(&"A", &"p1"), (&"B", &"p2")]);
//! ```
//!
//! `MultiVersionMap` is single-threaded. Wrap it in a [`SharedMap`] to use
//! it from several threads.

mod error;
mod map;
mod shared;
mod weave;

pub use error::{MapError, MapResult};
pub use map::{MapBuilder, MultiVersionMap};
pub use shared::SharedMap;
pub use weave::ScanStats;
pub use weave_version::{Version, VersionListKind};
