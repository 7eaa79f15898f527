//! Indexed range and recency queries
//!
//! One query shape recurs across metrics, activities and sessions:
//! "the records for this key, ordered by recency, optionally bounded
//! by a time range or a result count". RecencyQuery implements it
//! once, parameterized by entity kind, index and time field.

use std::sync::Arc;
use tabula_core::{EntityKind, FieldValue, Result, Timestamp};
use tabula_storage::{Record, RecordStore, ScanOptions, TimeField};

/// Optional bounds on a recency query
///
/// - `time_range = [start, end]` (inclusive): matching records come
///   back oldest-first; without a limit the count is unbounded.
/// - `limit` alone: the most recent `limit` records, newest-first.
/// - neither: everything for the key, newest-first.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBounds {
    /// Inclusive `[start, end]` filter on the time field
    pub time_range: Option<(Timestamp, Timestamp)>,
    /// Maximum number of records
    pub limit: Option<usize>,
}

impl QueryBounds {
    /// No bounds: everything for the key, newest-first
    pub const fn all() -> Self {
        Self {
            time_range: None,
            limit: None,
        }
    }

    /// The most recent `limit` records, newest-first
    pub const fn most_recent(limit: usize) -> Self {
        Self {
            time_range: None,
            limit: Some(limit),
        }
    }

    /// Records within `[start, end]` inclusive, oldest-first
    pub const fn within(start: Timestamp, end: Timestamp) -> Self {
        Self {
            time_range: Some((start, end)),
            limit: None,
        }
    }
}

/// Recency-ordered index scans for one entity kind
///
/// Stateless facade over `Arc<RecordStore>`. Records with equal
/// timestamps keep their insertion order in either direction.
#[derive(Debug, Clone)]
pub struct RecencyQuery {
    store: Arc<RecordStore>,
    kind: EntityKind,
    index: &'static str,
    time_field: TimeField,
}

impl RecencyQuery {
    /// Configure a recency query for one entity kind
    pub fn new(
        store: Arc<RecordStore>,
        kind: EntityKind,
        index: &'static str,
        time_field: TimeField,
    ) -> Self {
        Self {
            store,
            kind,
            index,
            time_field,
        }
    }

    fn options(&self, bounds: QueryBounds) -> ScanOptions {
        let mut opts = match bounds.time_range {
            Some((start, end)) => ScanOptions::ascending()
                .sorted_by(self.time_field)
                .in_range(start, end),
            None => ScanOptions::descending().sorted_by(self.time_field),
        };
        if let Some(limit) = bounds.limit {
            opts = opts.with_limit(limit);
        }
        opts
    }

    /// Records for one index key, per the bounds
    pub fn by_key(&self, key: &FieldValue, bounds: QueryBounds) -> Result<Vec<Record>> {
        self.store
            .scan_by_index(self.kind, self.index, key, self.options(bounds))
    }

    /// Records across the whole partition, per the bounds
    pub fn recent(&self, bounds: QueryBounds) -> Result<Vec<Record>> {
        self.store.scan_all(self.kind, self.options(bounds))
    }
}
