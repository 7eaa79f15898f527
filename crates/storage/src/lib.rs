//! Storage layer for the Tabula record store
//!
//! This crate owns all persisted state:
//! - Record: a stored row with store-maintained timestamps
//! - TableSchema / IndexDef: per-kind index declarations
//! - Table: one entity partition (rows + secondary indexes)
//! - RecordStore: the shared, thread-safe store facade
//!
//! The store is the sole owner of record identifiers and of the
//! `created_at` / `updated_at` bookkeeping. Uniqueness of natural keys
//! is *not* enforced here; the upsert engine layers that on top via
//! [`RecordStore::write`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod record;
pub mod schema;
pub mod store;
pub mod table;

pub use record::Record;
pub use schema::{IndexDef, TableSchema};
pub use store::RecordStore;
pub use table::{ScanOptions, ScanOrder, Table, TimeField};
