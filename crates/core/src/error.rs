//! Error types for the Tabula record store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! All errors surface synchronously with the failing operation, and a
//! failed operation leaves no partial mutation behind.

use crate::types::EntityKind;
use std::io;
use thiserror::Error;

/// Result type alias for Tabula operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Tabula record store
#[derive(Debug, Error)]
pub enum Error {
    /// Patch/update target does not exist
    #[error("{kind} record not found: {target}")]
    NotFound {
        /// Entity kind the lookup ran against
        kind: EntityKind,
        /// Identifier or natural key that missed
        target: String,
    },

    /// Strict-create mode violated: a record for the key already exists
    #[error("{kind} record already exists for {index}={key}")]
    AlreadyExists {
        /// Entity kind the create ran against
        kind: EntityKind,
        /// Natural-key index name
        index: &'static str,
        /// Display form of the offending key
        key: String,
    },

    /// Unique-index invariant violated: more than one record per key
    ///
    /// This indicates a data-integrity bug. It is never silently
    /// resolved by picking a record; callers should treat it as fatal.
    #[error("unique index {index} on {kind} holds {count} records for {key}")]
    MultipleMatches {
        /// Entity kind the lookup ran against
        kind: EntityKind,
        /// Index name that was assumed unique
        index: &'static str,
        /// Display form of the key with duplicates
        key: String,
        /// Number of records found (always >= 2)
        count: usize,
    },

    /// Storage fault; fatal for the operation, not retried by this layer
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// No table registered for this entity kind
    #[error("no table registered for entity kind {0}")]
    UnknownKind(EntityKind),

    /// The named index is not declared on this kind's table schema
    #[error("unknown index {index} on {kind}")]
    UnknownIndex {
        /// Entity kind the operation ran against
        kind: EntityKind,
        /// Requested index name
        index: String,
    },

    /// A value of this type cannot serve as an index key
    #[error("field {field} is not indexable: {reason}")]
    NotIndexable {
        /// Field the index is declared on
        field: String,
        /// Why the value cannot be an index key
        reason: String,
    },
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Unavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = Error::NotFound {
            kind: EntityKind::Profile,
            target: "user_42".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("profiles"));
        assert!(msg.contains("user_42"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_display_already_exists() {
        let err = Error::AlreadyExists {
            kind: EntityKind::Settings,
            index: "by_user_id",
            key: "user_42".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("settings"));
        assert!(msg.contains("by_user_id"));
        assert!(msg.contains("already exists"));
    }

    #[test]
    fn test_display_multiple_matches() {
        let err = Error::MultipleMatches {
            kind: EntityKind::User,
            index: "by_clerk_id",
            key: "clerk_1".to_string(),
            count: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("by_clerk_id"));
        assert!(msg.contains("2"));
    }

    #[test]
    fn test_display_unavailable() {
        let err = Error::Unavailable("write failed".to_string());
        assert!(err.to_string().contains("store unavailable"));
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Unavailable(_)));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_pattern_matching() {
        let err = Error::MultipleMatches {
            kind: EntityKind::User,
            index: "by_clerk_id",
            key: "k".to_string(),
            count: 3,
        };
        match err {
            Error::MultipleMatches { count, .. } => assert_eq!(count, 3),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn ok() -> Result<i32> {
            Ok(42)
        }
        fn err() -> Result<i32> {
            Err(Error::Unavailable("test".to_string()))
        }
        assert_eq!(ok().unwrap(), 42);
        assert!(err().is_err());
    }
}
