//! Field value types
//!
//! This module defines FieldValue, the unified enum for all record
//! field values.
//!
//! ## Canonical Value Model
//!
//! The FieldValue enum has exactly 6 variants:
//! - Null, Bool, Int, Float, String, Array
//!
//! ### Type Rules
//!
//! - No implicit type coercions
//! - `Int(1) != Float(1.0)` - different types are NEVER equal
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//!
//! Note that `Null` is itself a value. A field explicitly set to Null
//! is present; an *absent* field does not appear in `Fields` at all.
//! Partial updates rely on this distinction.

use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Canonical value type for record fields
///
/// Different types are NEVER equal, even if they contain the same
/// "value": `Int(1) != Float(1.0)`.
///
/// Float equality follows IEEE-754 semantics:
/// - `NaN != NaN`
/// - `-0.0 == 0.0`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldValue {
    /// Explicit null (distinct from an absent field)
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer (also carries timestamps, in millis)
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Array of values
    Array(Vec<FieldValue>),
}

// Custom PartialEq implementation for IEEE-754 float semantics
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => true,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Array(a), FieldValue::Array(b)) => a == b,
            // Different types are NEVER equal
            _ => false,
        }
    }
}

impl FieldValue {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "Null",
            FieldValue::Bool(_) => "Bool",
            FieldValue::Int(_) => "Int",
            FieldValue::Float(_) => "Float",
            FieldValue::String(_) => "String",
            FieldValue::Array(_) => "Array",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Get the boolean value, if this is a Bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer value, if this is an Int
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the float value, if this is a Float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the string value, if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the array elements, if this is an Array
    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Interpret an Int value as a millisecond timestamp
    ///
    /// Negative integers have no timestamp interpretation and yield None.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            FieldValue::Int(i) if *i >= 0 => Some(Timestamp::from_millis(*i as u64)),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(ts: Timestamp) -> Self {
        // Millis past i64::MAX saturate instead of wrapping negative,
        // mirroring the non-negative guard in `as_timestamp`.
        FieldValue::Int(i64::try_from(ts.as_millis()).unwrap_or(i64::MAX))
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(values: Vec<FieldValue>) -> Self {
        FieldValue::Array(values)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Array(values.into_iter().map(FieldValue::String).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_type_equality() {
        assert_eq!(FieldValue::Null, FieldValue::Null);
        assert_eq!(FieldValue::Bool(true), FieldValue::Bool(true));
        assert_eq!(FieldValue::Int(42), FieldValue::Int(42));
        assert_eq!(FieldValue::from("a"), FieldValue::from("a"));
    }

    #[test]
    fn test_cross_type_never_equal() {
        assert_ne!(FieldValue::Int(1), FieldValue::Float(1.0));
        assert_ne!(FieldValue::Bool(false), FieldValue::Null);
        assert_ne!(FieldValue::Int(0), FieldValue::Bool(false));
    }

    #[test]
    fn test_float_ieee754_semantics() {
        assert_ne!(FieldValue::Float(f64::NAN), FieldValue::Float(f64::NAN));
        assert_eq!(FieldValue::Float(-0.0), FieldValue::Float(0.0));
    }

    #[test]
    fn test_null_is_a_value() {
        assert!(FieldValue::Null.is_null());
        assert!(!FieldValue::Bool(false).is_null());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));
        assert_eq!(FieldValue::Int(7).as_i64(), Some(7));
        assert_eq!(FieldValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(FieldValue::from("hi").as_str(), Some("hi"));
        assert_eq!(FieldValue::Int(7).as_bool(), None);
        assert_eq!(FieldValue::from("hi").as_i64(), None);
    }

    #[test]
    fn test_timestamp_conversion() {
        let ts = Timestamp::from_millis(1_700_000_000_000);
        let value = FieldValue::from(ts);
        assert_eq!(value.as_timestamp(), Some(ts));
    }

    #[test]
    fn test_negative_int_is_not_a_timestamp() {
        assert_eq!(FieldValue::Int(-1).as_timestamp(), None);
    }

    #[test]
    fn test_timestamp_past_i64_max_saturates() {
        assert_eq!(FieldValue::from(Timestamp::MAX), FieldValue::Int(i64::MAX));
        assert_eq!(
            FieldValue::from(Timestamp::from_millis(i64::MAX as u64 + 1)),
            FieldValue::Int(i64::MAX)
        );
    }

    #[test]
    fn test_string_array_conversion() {
        let value = FieldValue::from(vec!["a".to_string(), "b".to_string()]);
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0].as_str(), Some("a"));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(FieldValue::Null.type_name(), "Null");
        assert_eq!(FieldValue::Array(vec![]).type_name(), "Array");
    }

    #[test]
    fn test_serde_roundtrip() {
        let value = FieldValue::Array(vec![
            FieldValue::Null,
            FieldValue::Bool(true),
            FieldValue::Int(-3),
            FieldValue::from("x"),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn scalar_value() -> impl Strategy<Value = FieldValue> {
            prop_oneof![
                Just(FieldValue::Null),
                any::<bool>().prop_map(FieldValue::Bool),
                any::<i64>().prop_map(FieldValue::Int),
                // Finite floats only; NaN breaks reflexivity on purpose
                prop::num::f64::NORMAL.prop_map(FieldValue::Float),
                ".*".prop_map(FieldValue::String),
            ]
        }

        proptest! {
            #[test]
            fn prop_equality_is_reflexive_for_non_nan(v in scalar_value()) {
                prop_assert_eq!(&v, &v.clone());
            }

            #[test]
            fn prop_serde_roundtrip_preserves_value(v in scalar_value()) {
                let json = serde_json::to_string(&v).unwrap();
                let back: FieldValue = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(v, back);
            }

            #[test]
            fn prop_int_never_equals_float(i in any::<i64>(), f in any::<f64>()) {
                prop_assert_ne!(FieldValue::Int(i), FieldValue::Float(f));
            }

            #[test]
            fn prop_timestamp_conversion_roundtrips(ms in 0u64..=i64::MAX as u64) {
                let ts = Timestamp::from_millis(ms);
                prop_assert_eq!(FieldValue::from(ts).as_timestamp(), Some(ts));
            }
        }
    }
}
