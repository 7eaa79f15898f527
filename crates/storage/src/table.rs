//! One entity partition: rows plus secondary indexes
//!
//! ## Design
//!
//! Rows live in a BTreeMap keyed by insertion sequence, so a plain
//! iteration *is* insertion order and the sequence doubles as the
//! tie-break for equal-timestamp sorts. Point lookups go through an
//! FxHashMap from RecordId to sequence. Secondary indexes are
//! maintained on every write from the table's schema.
//!
//! ## Mutation discipline
//!
//! Every mutating method validates index keys *before* touching any
//! state. A failed insert or patch leaves rows and indexes exactly as
//! they were.
//!
//! Table itself is not synchronized; `RecordStore` wraps each table in
//! a `parking_lot::RwLock` and is the only way callers reach one.

use crate::index::{FieldIndex, IndexKey};
use crate::record::Record;
use crate::schema::TableSchema;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tabula_core::{EntityKind, Error, FieldValue, Fields, RecordId, Result, Timestamp};
use tracing::warn;

/// Scan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    /// Oldest first (insertion order, or ascending sort key)
    Ascending,
    /// Newest first
    Descending,
}

/// Which timestamp a sorted scan orders by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    /// The record's store-maintained `created_at`
    Created,
    /// The record's store-maintained `updated_at`
    Updated,
    /// An Int field on the record, interpreted as millis
    ///
    /// Records lacking the field (or holding a non-Int value) are
    /// excluded from sorted scans, since they have no position on the
    /// time axis.
    Field(&'static str),
}

impl TimeField {
    /// The sort key for a record, in millis
    fn key_for(&self, record: &Record) -> Option<u64> {
        match self {
            TimeField::Created => Some(record.created_at.as_millis()),
            TimeField::Updated => Some(record.updated_at.as_millis()),
            TimeField::Field(name) => record.timestamp_field(name).map(|t| t.as_millis()),
        }
    }
}

/// Options controlling a scan
///
/// Without `sort`, results come back in insertion order (ascending)
/// or reverse insertion order (descending). With `sort`, results are
/// ordered by the chosen time field; records with equal sort keys keep
/// their insertion order in *both* directions.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Scan direction
    pub order: ScanOrder,
    /// Maximum number of records, applied after ordering
    pub limit: Option<usize>,
    /// Time field to sort by, if any
    pub sort: Option<TimeField>,
    /// Inclusive `[start, end]` filter on the sort field
    ///
    /// Only meaningful together with `sort`; ignored without it.
    pub time_range: Option<(Timestamp, Timestamp)>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            order: ScanOrder::Ascending,
            limit: None,
            sort: None,
            time_range: None,
        }
    }
}

impl ScanOptions {
    /// Insertion-order ascending scan
    pub fn ascending() -> Self {
        Self::default()
    }

    /// Reverse insertion-order scan
    pub fn descending() -> Self {
        Self {
            order: ScanOrder::Descending,
            ..Self::default()
        }
    }

    /// Cap the number of results (applied after ordering)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort by a time field
    pub fn sorted_by(mut self, field: TimeField) -> Self {
        self.sort = Some(field);
        self
    }

    /// Keep only records whose sort field falls in `[start, end]`
    pub fn in_range(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.time_range = Some((start, end));
        self
    }
}

/// One entity kind's records and indexes
#[derive(Debug)]
pub struct Table {
    schema: TableSchema,
    /// Rows keyed by insertion sequence; iteration is insertion order
    rows: BTreeMap<u64, Record>,
    by_id: FxHashMap<RecordId, u64>,
    indexes: FxHashMap<&'static str, FieldIndex>,
    next_seq: u64,
}

impl Table {
    /// Create an empty table for a schema
    pub fn new(schema: TableSchema) -> Self {
        let mut indexes = FxHashMap::default();
        for def in schema.indexes {
            indexes.insert(def.name, FieldIndex::new());
        }
        Self {
            schema,
            rows: BTreeMap::new(),
            by_id: FxHashMap::default(),
            indexes,
            next_seq: 0,
        }
    }

    /// The entity kind this table holds
    pub fn kind(&self) -> EntityKind {
        self.schema.kind
    }

    /// Number of records in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index keys this record contributes, one per index whose field
    /// is present. Fails without mutating anything if a value cannot
    /// be an index key.
    fn index_keys(&self, fields: &Fields) -> Result<Vec<(&'static str, IndexKey)>> {
        let mut keys = Vec::new();
        for def in self.schema.indexes {
            if let Some(value) = fields.get(def.field) {
                keys.push((def.name, IndexKey::from_value(def.field, value)?));
            }
        }
        Ok(keys)
    }

    /// Insert a record, assigning a fresh identifier
    ///
    /// Fields are stored verbatim; `created_at` and `updated_at` are
    /// both set to `now`.
    pub fn insert(&mut self, fields: Fields, now: Timestamp) -> Result<RecordId> {
        // Validate before mutating
        let keys = self.index_keys(&fields)?;

        let id = RecordId::new();
        let seq = self.next_seq;
        self.next_seq += 1;

        for (index_name, key) in keys {
            if let Some(index) = self.indexes.get_mut(index_name) {
                index.insert(key, seq);
            }
        }
        self.by_id.insert(id, seq);
        self.rows.insert(
            seq,
            Record {
                id,
                fields,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    /// Merge a partial field set into an existing record
    ///
    /// Fields absent from `patch` are untouched. `updated_at` is
    /// refreshed unconditionally, so an empty patch is not a no-op:
    /// it still advances `updated_at`.
    pub fn patch(&mut self, id: RecordId, patch: &Fields, now: Timestamp) -> Result<()> {
        let seq = *self.by_id.get(&id).ok_or_else(|| Error::NotFound {
            kind: self.schema.kind,
            target: id.to_string(),
        })?;

        // Validate replacement index keys before mutating
        let new_keys = self.index_keys(patch)?;

        let record = self
            .rows
            .get_mut(&seq)
            .expect("by_id and rows out of sync");

        // Re-point indexes whose key the patch actually changes. A
        // patch that re-supplies an indexed field with its current
        // value leaves the posting list alone, preserving within-key
        // insertion order.
        for def in self.schema.indexes {
            if !patch.contains(def.field) {
                continue;
            }
            let new_key = new_keys
                .iter()
                .find(|(name, _)| *name == def.name)
                .map(|(_, key)| key.clone());
            let old_key = match record.fields.get(def.field) {
                // Old value was validated when it was written
                Some(value) => Some(IndexKey::from_value(def.field, value)?),
                None => None,
            };
            if old_key == new_key {
                continue;
            }
            if let Some(index) = self.indexes.get_mut(def.name) {
                if let Some(key) = old_key {
                    index.remove(&key, seq);
                }
                if let Some(key) = new_key {
                    index.insert(key, seq);
                }
            }
        }

        record.fields.merge(patch);
        record.updated_at = now;
        Ok(())
    }

    /// Point lookup by record identifier
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.by_id.get(&id).and_then(|seq| self.rows.get(seq))
    }

    /// Look up at most one record by index key
    ///
    /// Fails with `MultipleMatches` if the index holds more than one
    /// record for the key. The engine assumes natural-key uniqueness;
    /// a violation is a data-integrity bug and is logged, never
    /// silently resolved by picking a record.
    pub fn find_unique(&self, index: &str, key: &FieldValue) -> Result<Option<&Record>> {
        let def = self
            .schema
            .index(index)
            .ok_or_else(|| Error::UnknownIndex {
                kind: self.schema.kind,
                index: index.to_string(),
            })?;
        let ikey = IndexKey::from_value(def.field, key)?;
        let seqs = self
            .indexes
            .get(def.name)
            .map(|i| i.seqs(&ikey))
            .unwrap_or(&[]);
        match seqs {
            [] => Ok(None),
            [seq] => Ok(self.rows.get(seq)),
            many => {
                warn!(
                    target: "tabula::store",
                    kind = %self.schema.kind,
                    index = def.name,
                    key = %ikey.display(),
                    count = many.len(),
                    "unique index invariant violated"
                );
                Err(Error::MultipleMatches {
                    kind: self.schema.kind,
                    index: def.name,
                    key: ikey.display(),
                    count: many.len(),
                })
            }
        }
    }

    /// Scan the records under one index key
    pub fn scan(&self, index: &str, key: &FieldValue, opts: ScanOptions) -> Result<Vec<Record>> {
        let def = self
            .schema
            .index(index)
            .ok_or_else(|| Error::UnknownIndex {
                kind: self.schema.kind,
                index: index.to_string(),
            })?;
        let ikey = IndexKey::from_value(def.field, key)?;
        let matches: Vec<(u64, &Record)> = self
            .indexes
            .get(def.name)
            .map(|i| i.seqs(&ikey))
            .unwrap_or(&[])
            .iter()
            .filter_map(|seq| self.rows.get(seq).map(|r| (*seq, r)))
            .collect();
        Ok(Self::apply_options(matches, opts))
    }

    /// Scan the whole partition
    pub fn scan_all(&self, opts: ScanOptions) -> Vec<Record> {
        let matches: Vec<(u64, &Record)> = self.rows.iter().map(|(s, r)| (*s, r)).collect();
        Self::apply_options(matches, opts)
    }

    /// Filter, sort, orient and truncate a match set
    ///
    /// `matches` arrives in insertion order. Sorting is done with a
    /// direction-aware comparator rather than sort-then-reverse so
    /// that equal sort keys keep insertion order in both directions.
    fn apply_options(mut matches: Vec<(u64, &Record)>, opts: ScanOptions) -> Vec<Record> {
        if let Some(field) = opts.sort {
            matches.retain(|(_, r)| field.key_for(r).is_some());
            if let Some((start, end)) = opts.time_range {
                matches.retain(|(_, r)| {
                    let key = field.key_for(r).expect("retained above");
                    key >= start.as_millis() && key <= end.as_millis()
                });
            }
            match opts.order {
                ScanOrder::Ascending => {
                    matches.sort_by_key(|(_, r)| field.key_for(r).expect("retained above"))
                }
                ScanOrder::Descending => matches.sort_by(|(_, a), (_, b)| {
                    let ka = field.key_for(a).expect("retained above");
                    let kb = field.key_for(b).expect("retained above");
                    kb.cmp(&ka)
                }),
            }
        } else if opts.order == ScanOrder::Descending {
            matches.reverse();
        }
        if let Some(limit) = opts.limit {
            matches.truncate(limit);
        }
        matches.into_iter().map(|(_, r)| r.clone()).collect()
    }
}
