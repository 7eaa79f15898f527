//! Secondary indexes for efficient query patterns
//!
//! A FieldIndex maps an index key to the insertion sequence numbers of
//! the records carrying that key, keeping equal-key scans in insertion
//! order without scanning the whole table.
//!
//! Index keys must be hashable, so only Null, Bool, Int and String
//! field values qualify. Floats and arrays are rejected at write time
//! rather than silently hashed by approximation.

use rustc_hash::FxHashMap;
use tabula_core::{Error, FieldValue, Result};

/// Hashable projection of a FieldValue used as an index key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// Explicit null key
    Null,
    /// Boolean key (e.g. the `is_active` flag index)
    Bool(bool),
    /// Integer key (timestamps, priorities)
    Int(i64),
    /// String key (user ids, metric names, actions)
    String(String),
}

impl IndexKey {
    /// Convert a field value into an index key
    ///
    /// Floats and arrays have no stable hashable form and yield
    /// `NotIndexable`.
    pub fn from_value(field: &str, value: &FieldValue) -> Result<Self> {
        match value {
            FieldValue::Null => Ok(IndexKey::Null),
            FieldValue::Bool(b) => Ok(IndexKey::Bool(*b)),
            FieldValue::Int(i) => Ok(IndexKey::Int(*i)),
            FieldValue::String(s) => Ok(IndexKey::String(s.clone())),
            FieldValue::Float(_) | FieldValue::Array(_) => Err(Error::NotIndexable {
                field: field.to_string(),
                reason: format!("{} values cannot be index keys", value.type_name()),
            }),
        }
    }

    /// Display form used in error messages and logs
    pub fn display(&self) -> String {
        match self {
            IndexKey::Null => "null".to_string(),
            IndexKey::Bool(b) => b.to_string(),
            IndexKey::Int(i) => i.to_string(),
            IndexKey::String(s) => s.clone(),
        }
    }
}

/// Secondary index: key -> insertion sequences, in insertion order
#[derive(Debug, Default)]
pub struct FieldIndex {
    entries: FxHashMap<IndexKey, Vec<u64>>,
}

impl FieldIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Add a record's sequence under `key`
    ///
    /// Sequences are appended, so a key's postings stay in insertion
    /// order without sorting.
    pub fn insert(&mut self, key: IndexKey, seq: u64) {
        self.entries.entry(key).or_default().push(seq);
    }

    /// Remove a record's sequence from `key`
    ///
    /// Drops the key entirely when its posting list becomes empty to
    /// avoid accumulating empty entries.
    pub fn remove(&mut self, key: &IndexKey, seq: u64) {
        if let Some(seqs) = self.entries.get_mut(key) {
            seqs.retain(|s| *s != seq);
            if seqs.is_empty() {
                self.entries.remove(key);
            }
        }
    }

    /// Sequences stored under `key`, in insertion order
    pub fn seqs(&self, key: &IndexKey) -> &[u64] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keys in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
