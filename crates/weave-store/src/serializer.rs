//! Payload serializers.

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};

use crate::StoreResult;

/// Converts payloads to and from the string form kept in a [`KvStore`].
///
/// [`KvStore`]: crate::KvStore
pub trait Serializer<P>: Send + Sync {
    /// Encode a payload.
    fn serialize(&self, payload: &P) -> StoreResult<String>;

    /// Decode a payload.
    fn deserialize(&self, encoded: &str) -> StoreResult<P>;
}

/// JSON serializer for any serde payload.
pub struct JsonSerializer<P> {
    _payload: PhantomData<fn() -> P>,
}

impl<P> JsonSerializer<P> {
    /// Create a JSON serializer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _payload: PhantomData,
        }
    }
}

impl<P> Default for JsonSerializer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for JsonSerializer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonSerializer")
    }
}

impl<P: Serialize + DeserializeOwned> Serializer<P> for JsonSerializer<P> {
    fn serialize(&self, payload: &P) -> StoreResult<String> {
        Ok(serde_json::to_string(payload)?)
    }

    fn deserialize(&self, encoded: &str) -> StoreResult<P> {
        Ok(serde_json::from_str(encoded)?)
    }
}
