//! Time-windowed active-set logic
//!
//! An active window is an optional start/end timestamp pair: a record
//! is active at `now` iff the start is absent or past and the end is
//! absent or not yet reached. An absent bound is unbounded on that
//! side.
//!
//! ## Stored flag semantics
//!
//! The platform stores the activity flag computed *at write time* and
//! does not rewrite it as time passes, so a stored flag can go stale
//! once `now` moves past a fixed end date. [`ActiveSetQuery`]
//! compensates: it selects on the stored flag via the index, then
//! re-checks the window predicate against current time, so the
//! returned *set* is always correct even when a stored flag is stale.

use std::sync::Arc;
use tabula_core::{EntityKind, FieldValue, Result, Timestamp};
use tabula_storage::{Record, RecordStore, ScanOptions, TimeField};

/// Optional start/end pair bounding when a record is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveWindow {
    /// Inclusive start; absent means active since forever
    pub start: Option<Timestamp>,
    /// Inclusive end; absent means active forever
    pub end: Option<Timestamp>,
}

impl ActiveWindow {
    /// Window with the given bounds
    pub const fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Window with no bounds; always active
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Read a window from a record's optional timestamp fields
    ///
    /// A field that is absent, explicitly null, or not an Int reads as
    /// an unbounded side.
    pub fn from_record(record: &Record, start_field: &str, end_field: &str) -> Self {
        Self {
            start: record.timestamp_field(start_field),
            end: record.timestamp_field(end_field),
        }
    }

    /// Whether the window contains `now`
    ///
    /// Active iff (start absent OR start <= now) AND (end absent OR
    /// end >= now). Both bounds are inclusive.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        let started = self.start.map_or(true, |s| s <= now);
        let not_ended = self.end.map_or(true, |e| e >= now);
        started && not_ended
    }
}

/// Query for the records whose window contains the current moment
///
/// Configured per entity kind with the index over the stored flag and
/// the window field names. Stateless facade over `Arc<RecordStore>`.
#[derive(Debug, Clone)]
pub struct ActiveSetQuery {
    store: Arc<RecordStore>,
    kind: EntityKind,
    flag_index: &'static str,
    start_field: &'static str,
    end_field: &'static str,
    audience_field: Option<&'static str>,
}

impl ActiveSetQuery {
    /// Configure an active-set query for one entity kind
    ///
    /// `flag_index` must be an index over the stored boolean flag.
    /// When `audience_field` is set, queries may additionally restrict
    /// to one audience, with `"all"` as the match-everyone sentinel.
    pub fn new(
        store: Arc<RecordStore>,
        kind: EntityKind,
        flag_index: &'static str,
        start_field: &'static str,
        end_field: &'static str,
        audience_field: Option<&'static str>,
    ) -> Self {
        Self {
            store,
            kind,
            flag_index,
            start_field,
            end_field,
            audience_field,
        }
    }

    /// Records active at `now`, most recently created first
    ///
    /// Selects records whose stored flag is true, re-filters by the
    /// window predicate at `now`, and optionally restricts to records
    /// whose audience equals `audience` or the `"all"` sentinel.
    pub fn query_active(&self, audience: Option<&str>, now: Timestamp) -> Result<Vec<Record>> {
        let mut records = self.store.scan_by_index(
            self.kind,
            self.flag_index,
            &FieldValue::Bool(true),
            ScanOptions::descending().sorted_by(TimeField::Created),
        )?;
        records.retain(|r| {
            ActiveWindow::from_record(r, self.start_field, self.end_field).is_active_at(now)
        });
        if let (Some(field), Some(requested)) = (self.audience_field, audience) {
            records.retain(|r| match r.str_field(field) {
                Some(a) => a == "all" || a == requested,
                None => false,
            });
        }
        Ok(records)
    }
}
