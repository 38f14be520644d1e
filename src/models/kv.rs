//! Key-value pair type.

use serde::{Deserialize, Serialize};

/// A single key-value pair as stored and returned by every KV backend.
///
/// Keys and values are opaque strings. Missing fields decode as empty
/// strings so that request validation can reject them uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// The key.
    #[serde(default)]
    pub key: String,
    /// The value.
    #[serde(default)]
    pub value: String,
}

impl KeyValuePair {
    /// Creates a new pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns true when both key and value are non-empty.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.value.is_empty()
    }
}
