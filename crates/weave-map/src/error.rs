//! Map error types.

use thiserror::Error;
use weave_version::VersionError;

/// Map error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// A version list rejected an append.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Range start sorts after range end.
    #[error("invalid range: start key is after end key")]
    InvalidRange,

    /// The version counter cannot advance any further.
    #[error("version counter exhausted")]
    VersionsExhausted,
}

/// Result type for map operations.
pub type MapResult<T> = Result<T, MapError>;
