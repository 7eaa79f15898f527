//! Unique-key upsert engine
//!
//! ## Design
//!
//! The platform's per-entity handlers repeat one pattern: look up a
//! record by a natural key through a unique index, then either patch
//! it or insert a new one. UpsertEngine implements that pattern once,
//! parameterized by entity kind, index and key field, with the two
//! policies that recur across kinds as explicit modes:
//!
//! - **Sync**: silently insert-or-patch (extension telemetry)
//! - **StrictCreate**: fail with `AlreadyExists` when a record for
//!   the key exists (profile and settings creation)
//!
//! ## Atomicity
//!
//! The lookup-then-write sequence runs inside
//! [`RecordStore::write`], under the table's write lock. Two
//! concurrent upserts for the same key serialize there, so duplicate
//! inserts cannot happen. A failed call mutates nothing: uniqueness
//! and index-key validation both precede the first write.

use std::sync::Arc;
use tabula_core::{EntityKind, Error, FieldValue, Fields, RecordId, Result};
use tabula_storage::{Record, RecordStore};
use tracing::debug;

/// Upsert policy for an entity kind's natural key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    /// Insert if absent, patch if present; never errors on existence
    Sync,
    /// Insert if absent, `AlreadyExists` if present
    StrictCreate,
}

/// Insert-if-absent-else-patch engine keyed by a natural key
///
/// Stateless facade over `Arc<RecordStore>`; cheap to construct and
/// clone, safe to share across threads.
#[derive(Debug, Clone)]
pub struct UpsertEngine {
    store: Arc<RecordStore>,
    kind: EntityKind,
    index: &'static str,
    key_field: &'static str,
    mode: UpsertMode,
}

/// Display form of a natural key for error messages
fn display_key(key: &FieldValue) -> String {
    match key {
        FieldValue::String(s) => s.clone(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Null => "null".to_string(),
        other => format!("{other:?}"),
    }
}

impl UpsertEngine {
    /// Configure an upsert engine for one entity kind
    ///
    /// `index` must be declared unique in the kind's schema and keyed
    /// on `key_field`; the engine writes `key_field` into every record
    /// it inserts.
    pub fn new(
        store: Arc<RecordStore>,
        kind: EntityKind,
        index: &'static str,
        key_field: &'static str,
        mode: UpsertMode,
    ) -> Self {
        Self {
            store,
            kind,
            index,
            key_field,
            mode,
        }
    }

    /// The record currently stored for a natural key, if any
    pub fn get(&self, key: &FieldValue) -> Result<Option<Record>> {
        self.store.find_unique_by_index(self.kind, self.index, key)
    }

    /// Insert-or-patch by natural key, per the engine's mode
    ///
    /// Returns the id of the record now holding the key. In Sync mode
    /// an existing record is patched with `fields` (absent fields
    /// untouched) and its `updated_at` refreshed. In StrictCreate mode
    /// an existing record is an `AlreadyExists` error.
    pub fn upsert(&self, key: &FieldValue, fields: Fields) -> Result<RecordId> {
        self.store.write(self.kind, |table, now| {
            let existing = table.find_unique(self.index, key)?.map(|r| r.id);
            match existing {
                Some(id) => match self.mode {
                    UpsertMode::Sync => {
                        table.patch(id, &fields, now)?;
                        debug!(
                            target: "tabula::engine",
                            kind = %self.kind,
                            key = %display_key(key),
                            id = %id,
                            "upsert patched existing record"
                        );
                        Ok(id)
                    }
                    UpsertMode::StrictCreate => Err(Error::AlreadyExists {
                        kind: self.kind,
                        index: self.index,
                        key: display_key(key),
                    }),
                },
                None => {
                    let mut fields = fields;
                    fields.set(self.key_field, key.clone());
                    let id = table.insert(fields, now)?;
                    debug!(
                        target: "tabula::engine",
                        kind = %self.kind,
                        key = %display_key(key),
                        id = %id,
                        "upsert inserted new record"
                    );
                    Ok(id)
                }
            }
        })
    }

    /// Patch the record for a natural key
    ///
    /// Fails with `NotFound` if no record holds the key. Runs in the
    /// same write section as `upsert`, so it cannot race a concurrent
    /// insert into patching a record that was just replaced.
    pub fn update(&self, key: &FieldValue, patch: &Fields) -> Result<RecordId> {
        self.store.write(self.kind, |table, now| {
            let existing = table.find_unique(self.index, key)?.map(|r| r.id);
            match existing {
                Some(id) => {
                    table.patch(id, patch, now)?;
                    Ok(id)
                }
                None => Err(Error::NotFound {
                    kind: self.kind,
                    target: display_key(key),
                }),
            }
        })
    }
}
