//! Stored record representation

use serde::{Deserialize, Serialize};
use tabula_core::{FieldValue, Fields, RecordId, Timestamp};

/// A stored record: identifier, payload, store-maintained timestamps
///
/// The store assigns `id` at insert and never changes it. `created_at`
/// is set once; `updated_at` is refreshed on every mutation (insert
/// counts as the first update), so `updated_at >= created_at` always
/// holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier, immutable, never reused
    pub id: RecordId,
    /// The record's fields
    pub fields: Fields,
    /// Insert time, in store millis; never mutated after insert
    pub created_at: Timestamp,
    /// Last mutation time; insert counts as the first update
    pub updated_at: Timestamp,
}

impl Record {
    /// Get a field value, if the field is present
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Get a string field
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(|v| v.as_str())
    }

    /// Get an integer field
    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(|v| v.as_i64())
    }

    /// Get a boolean field
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(|v| v.as_bool())
    }

    /// Get an Int field interpreted as a millisecond timestamp
    pub fn timestamp_field(&self, name: &str) -> Option<Timestamp> {
        self.field(name).and_then(|v| v.as_timestamp())
    }
}
