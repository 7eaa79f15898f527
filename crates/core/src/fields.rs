//! Named field maps
//!
//! A `Fields` map carries a record's payload: field name to FieldValue.
//! The same type doubles as a *patch*: a partial field set merged into
//! an existing record. The merge contract is the heart of partial
//! updates:
//!
//! - a name present in the patch overwrites the record's field,
//!   including an explicit `Null`
//! - a name absent from the patch leaves the record's field untouched
//!
//! Absence and null are therefore different things and must never be
//! conflated by callers.

use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Ordered map from field name to value
///
/// Backed by a BTreeMap so iteration order is deterministic, which
/// keeps scans, logs and test assertions stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    /// Create an empty field map
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Number of fields present
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields are present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the named field is present (an explicit Null counts)
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Get the value of a field, if present
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Set a field, replacing any existing value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style `set`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field only when `value` is Some
    ///
    /// Convenience for building patches from optional inputs: a `None`
    /// input means "leave the field alone", so nothing is recorded.
    pub fn set_opt(&mut self, name: impl Into<String>, value: Option<impl Into<FieldValue>>) {
        if let Some(v) = value {
            self.set(name, v);
        }
    }

    /// Merge a patch into this field map
    ///
    /// Every field present in `patch` overwrites the field here;
    /// fields absent from `patch` are untouched. An empty patch
    /// changes nothing.
    pub fn merge(&mut self, patch: &Fields) {
        for (name, value) in patch.iter() {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, FieldValue)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Fields {
    type Item = (String, FieldValue);
    type IntoIter = btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut fields = Fields::new();
        fields.set("email", "a@example.com");
        assert_eq!(
            fields.get("email").and_then(|v| v.as_str()),
            Some("a@example.com")
        );
        assert!(fields.get("missing").is_none());
    }

    #[test]
    fn test_builder_style() {
        let fields = Fields::new().with("a", 1i64).with("b", true);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("a").and_then(|v| v.as_i64()), Some(1));
    }

    #[test]
    fn test_absence_is_distinct_from_null() {
        let fields = Fields::new().with("bio", FieldValue::Null);
        assert!(fields.contains("bio"));
        assert!(!fields.contains("timezone"));
        assert!(fields.get("bio").unwrap().is_null());
    }

    #[test]
    fn test_merge_overwrites_present_fields_only() {
        let mut record = Fields::new()
            .with("first_name", "Ada")
            .with("last_name", "Lovelace");
        let patch = Fields::new().with("first_name", "Grace");

        record.merge(&patch);

        assert_eq!(
            record.get("first_name").and_then(|v| v.as_str()),
            Some("Grace")
        );
        // Absent from patch: untouched
        assert_eq!(
            record.get("last_name").and_then(|v| v.as_str()),
            Some("Lovelace")
        );
    }

    #[test]
    fn test_merge_explicit_null_clears_value() {
        let mut record = Fields::new().with("bio", "hello");
        let patch = Fields::new().with("bio", FieldValue::Null);

        record.merge(&patch);

        assert!(record.get("bio").unwrap().is_null());
    }

    #[test]
    fn test_merge_empty_patch_is_identity() {
        let mut record = Fields::new().with("a", 1i64);
        let before = record.clone();
        record.merge(&Fields::new());
        assert_eq!(record, before);
    }

    #[test]
    fn test_merge_adds_new_fields() {
        let mut record = Fields::new().with("a", 1i64);
        let patch = Fields::new().with("b", 2i64);
        record.merge(&patch);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_set_opt() {
        let mut patch = Fields::new();
        patch.set_opt("present", Some("x"));
        patch.set_opt("absent", None::<&str>);
        assert!(patch.contains("present"));
        assert!(!patch.contains("absent"));
    }

    #[test]
    fn test_iteration_order_is_name_order() {
        let fields = Fields::new().with("b", 2i64).with("a", 1i64).with("c", 3i64);
        let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let fields = Fields::new().with("n", 1i64).with("s", "v");
        let json = serde_json::to_string(&fields).unwrap();
        let back: Fields = serde_json::from_str(&json).unwrap();
        assert_eq!(fields, back);
    }
}
