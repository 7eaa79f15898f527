//! Core types for the Tabula record store
//!
//! This crate defines the foundational types used throughout the system:
//! - RecordId: Store-assigned identifier for a record
//! - EntityKind: Discriminates the platform's entity tables
//! - FieldValue: Unified value enum for all record fields
//! - Fields: Named field map with absence distinct from null
//! - Timestamp: Millisecond-precision wall-clock timestamps
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fields;
pub mod timestamp;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use error::{Error, Result};
pub use fields::Fields;
pub use timestamp::Timestamp;
pub use types::{EntityKind, RecordId};
pub use value::FieldValue;
