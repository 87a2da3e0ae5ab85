//! Replicated change records
//!
//! A [`ChangeRecord`] is the unit of replication: one key/value write made in
//! an origin region. On the wire only the key and value travel, as a flat JSON
//! object `{"key": "...", "value": "..."}` ([`ChangePayload`]). The origin is
//! implied by which region channel the publisher chose, so it is not encoded.
//! Unknown fields are ignored on decode, which leaves room to add fields later
//! without breaking older consumers.

use crate::error::{Error, Result};
use crate::value_objects::RegionName;
use serde::{Deserialize, Serialize};

/// A write originating in one region, to be applied in every other region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    key: String,
    value: String,
    origin_region: RegionName,
}

impl ChangeRecord {
    /// Create a change record
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V, origin_region: RegionName) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            origin_region,
        }
    }

    /// The written key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The written value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Region where the write was issued
    pub fn origin_region(&self) -> &RegionName {
        &self.origin_region
    }

    /// The wire form of this record
    pub fn payload(&self) -> ChangePayload {
        ChangePayload {
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }

    /// Serialize the wire form to bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.payload().encode()
    }
}

/// Wire form of a change record: `{"key": ..., "value": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePayload {
    /// The written key
    pub key: String,
    /// The written value
    pub value: String,
}

impl ChangePayload {
    /// Serialize to JSON bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a delivered payload
    ///
    /// Anything that is not a JSON object with string `key` and `value`
    /// fields is reported as [`Error::MalformedRecord`].
    pub fn decode(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(|e| Error::malformed_record(e.to_string()))
    }

    /// Attach the origin region, producing a full record
    pub fn into_record(self, origin_region: RegionName) -> ChangeRecord {
        ChangeRecord {
            key: self.key,
            value: self.value,
            origin_region,
        }
    }
}
