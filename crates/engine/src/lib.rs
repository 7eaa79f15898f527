//! Query and upsert engines over the Tabula record store
//!
//! This crate holds the three reusable pieces of design logic the
//! per-entity handlers share, each parameterized by entity kind and
//! index name instead of being duplicated per kind:
//!
//! - [`UpsertEngine`]: insert-if-absent-else-patch keyed by a natural
//!   key, in sync or strict-create mode
//! - [`ActiveWindow`] / [`ActiveSetQuery`]: optional start/end window
//!   membership and the stored-flag active-set query
//! - [`RecencyQuery`]: recency- and range-bounded index scans
//!
//! All three are stateless facades over `Arc<RecordStore>`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod query;
pub mod upsert;
pub mod window;

pub use query::{QueryBounds, RecencyQuery};
pub use upsert::{UpsertEngine, UpsertMode};
pub use window::{ActiveSetQuery, ActiveWindow};
