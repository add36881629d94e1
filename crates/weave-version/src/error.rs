//! Version list error types.

use thiserror::Error;

use crate::{NodeId, Version};

/// Version list error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Append timestamp is not after the newest timestamp in the list.
    #[error("non-monotonic append: timestamp {attempted} is not after {last}")]
    NonMonotonic {
        /// Newest timestamp already in the list.
        last: Version,
        /// Rejected timestamp.
        attempted: Version,
    },

    /// The list already holds [`NodeId::CAPACITY`] versions.
    #[error("version list is full ({} versions)", NodeId::CAPACITY)]
    Full,
}

/// Result type for version list operations.
pub type VersionResult<T> = Result<T, VersionError>;
