//! RecordStore: the shared, thread-safe store facade
//!
//! ## Design
//!
//! One `RwLock<Table>` per entity kind, reached through a DashMap
//! registry (lock-free lookup; registration happens once at startup).
//! Reads take a table's read lock; mutations take its write lock.
//! Nothing ever holds two table locks at once, so no operation blocks
//! on another entity kind and lock ordering is a non-issue.
//!
//! ## Write sections
//!
//! [`RecordStore::write`] runs a closure under a table's write lock.
//! The upsert engine uses it to make its lookup-then-write sequence
//! atomic with respect to the natural key: two concurrent upserts for
//! the same key serialize on the lock, so they can never both insert.
//!
//! ## Thread Safety
//!
//! RecordStore is `Send + Sync` and is shared via `Arc`.

use crate::record::Record;
use crate::schema::TableSchema;
use crate::table::{ScanOptions, Table};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tabula_core::{EntityKind, Error, FieldValue, Fields, RecordId, Result, Timestamp};
use tracing::debug;

/// Durable, indexed keeping of entity records
///
/// The store is the sole owner of persisted state and of record
/// identifiers. All public operations are single-table: one kind, at
/// most one index lookup.
#[derive(Debug, Default)]
pub struct RecordStore {
    tables: DashMap<EntityKind, Arc<RwLock<Table>>>,
}

impl RecordStore {
    /// Create an empty store with no tables registered
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
        }
    }

    /// Create a store with a table per schema
    pub fn with_schemas(schemas: impl IntoIterator<Item = TableSchema>) -> Self {
        let store = Self::new();
        for schema in schemas {
            store.register(schema);
        }
        store
    }

    /// Register a table for an entity kind
    ///
    /// Re-registering a kind replaces its (empty or not) table; this
    /// is only sensible in tests.
    pub fn register(&self, schema: TableSchema) {
        debug!(target: "tabula::store", kind = %schema.kind, "registering table");
        self.tables
            .insert(schema.kind, Arc::new(RwLock::new(Table::new(schema))));
    }

    fn table(&self, kind: EntityKind) -> Result<Arc<RwLock<Table>>> {
        self.tables
            .get(&kind)
            .map(|t| Arc::clone(t.value()))
            .ok_or(Error::UnknownKind(kind))
    }

    /// Insert a record, assigning a fresh identifier
    ///
    /// Stores `fields` verbatim plus `created_at = updated_at = now`.
    pub fn insert(&self, kind: EntityKind, fields: Fields) -> Result<RecordId> {
        let table = self.table(kind)?;
        let id = table.write().insert(fields, Timestamp::now())?;
        debug!(target: "tabula::store", kind = %kind, id = %id, "inserted record");
        Ok(id)
    }

    /// Merge a partial field set into an existing record
    ///
    /// Fields absent from `patch` are untouched; `updated_at` is
    /// refreshed (an empty patch still advances it). Fails with
    /// `NotFound` if `id` does not exist.
    pub fn patch(&self, kind: EntityKind, id: RecordId, patch: &Fields) -> Result<()> {
        let table = self.table(kind)?;
        table.write().patch(id, patch, Timestamp::now())?;
        debug!(target: "tabula::store", kind = %kind, id = %id, "patched record");
        Ok(())
    }

    /// Point lookup by record identifier
    pub fn get_by_id(&self, kind: EntityKind, id: RecordId) -> Result<Option<Record>> {
        let table = self.table(kind)?;
        let guard = table.read();
        Ok(guard.get(id).cloned())
    }

    /// Look up at most one record by index key
    ///
    /// Fails with `MultipleMatches` if the index is not actually
    /// unique for the key - detected, never silently resolved.
    pub fn find_unique_by_index(
        &self,
        kind: EntityKind,
        index: &str,
        key: &FieldValue,
    ) -> Result<Option<Record>> {
        let table = self.table(kind)?;
        let guard = table.read();
        Ok(guard.find_unique(index, key)?.cloned())
    }

    /// Scan records under one index key
    pub fn scan_by_index(
        &self,
        kind: EntityKind,
        index: &str,
        key: &FieldValue,
        opts: ScanOptions,
    ) -> Result<Vec<Record>> {
        let table = self.table(kind)?;
        let guard = table.read();
        guard.scan(index, key, opts)
    }

    /// Scan a kind's whole partition
    pub fn scan_all(&self, kind: EntityKind, opts: ScanOptions) -> Result<Vec<Record>> {
        let table = self.table(kind)?;
        let guard = table.read();
        Ok(guard.scan_all(opts))
    }

    /// Number of records held for a kind
    pub fn count(&self, kind: EntityKind) -> Result<usize> {
        let table = self.table(kind)?;
        let guard = table.read();
        Ok(guard.len())
    }

    /// Run a closure under a table's write lock
    ///
    /// The closure sees the table exclusively, so a lookup followed by
    /// an insert-or-patch inside it is serializable with respect to
    /// every other write on the same kind. The current time is passed
    /// in so one section uses one consistent `now`.
    pub fn write<T>(
        &self,
        kind: EntityKind,
        f: impl FnOnce(&mut Table, Timestamp) -> Result<T>,
    ) -> Result<T> {
        let table = self.table(kind)?;
        let mut guard = table.write();
        f(&mut guard, Timestamp::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IndexDef;
    use crate::table::ScanOrder;

    const USER_INDEXES: [IndexDef; 2] = [
        IndexDef::unique("by_clerk_id", "clerk_id"),
        IndexDef::new("by_email", "email"),
    ];

    fn store() -> RecordStore {
        RecordStore::with_schemas([TableSchema::new(EntityKind::User, &USER_INDEXES)])
    }

    fn user_fields(clerk_id: &str) -> Fields {
        Fields::new()
            .with("clerk_id", clerk_id)
            .with("email", format!("{clerk_id}@example.com"))
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecordStore>();
    }

    #[test]
    fn test_insert_get_roundtrip() {
        let store = store();
        let fields = user_fields("clerk_1");
        let id = store.insert(EntityKind::User, fields.clone()).unwrap();

        let record = store.get_by_id(EntityKind::User, id).unwrap().unwrap();
        assert_eq!(record.fields, fields);
        assert!(record.updated_at >= record.created_at);
    }

    #[test]
    fn test_unregistered_kind_is_rejected() {
        let store = store();
        let err = store
            .insert(EntityKind::Metric, Fields::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownKind(EntityKind::Metric)));
    }

    #[test]
    fn test_patch_not_found() {
        let store = store();
        let err = store
            .patch(EntityKind::User, RecordId::new(), &Fields::new())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_find_unique_by_index() {
        let store = store();
        let id = store.insert(EntityKind::User, user_fields("clerk_1")).unwrap();
        store.insert(EntityKind::User, user_fields("clerk_2")).unwrap();

        let found = store
            .find_unique_by_index(EntityKind::User, "by_clerk_id", &FieldValue::from("clerk_1"))
            .unwrap()
            .unwrap();
        assert_eq!(found.id, id);

        let missing = store
            .find_unique_by_index(EntityKind::User, "by_clerk_id", &FieldValue::from("clerk_9"))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_scan_by_index_orders() {
        let store = store();
        // Two users sharing an email (by_email is non-unique)
        for clerk in ["a", "b"] {
            store
                .insert(
                    EntityKind::User,
                    Fields::new()
                        .with("clerk_id", clerk)
                        .with("email", "shared@example.com"),
                )
                .unwrap();
        }

        let asc = store
            .scan_by_index(
                EntityKind::User,
                "by_email",
                &FieldValue::from("shared@example.com"),
                ScanOptions::ascending(),
            )
            .unwrap();
        assert_eq!(asc.len(), 2);
        assert_eq!(asc[0].str_field("clerk_id"), Some("a"));

        let desc = store
            .scan_by_index(
                EntityKind::User,
                "by_email",
                &FieldValue::from("shared@example.com"),
                ScanOptions::descending(),
            )
            .unwrap();
        assert_eq!(desc[0].str_field("clerk_id"), Some("b"));
    }

    #[test]
    fn test_write_section_sees_consistent_table() {
        let store = store();
        let id = store
            .write(EntityKind::User, |table, now| {
                assert!(table
                    .find_unique("by_clerk_id", &FieldValue::from("clerk_1"))?
                    .is_none());
                table.insert(user_fields("clerk_1"), now)
            })
            .unwrap();
        assert!(store.get_by_id(EntityKind::User, id).unwrap().is_some());
    }

    #[test]
    fn test_write_section_error_propagates() {
        let store = store();
        let result: Result<()> = store.write(EntityKind::User, |_table, _now| {
            Err(Error::Unavailable("boom".to_string()))
        });
        assert!(matches!(result, Err(Error::Unavailable(_))));
        assert_eq!(store.count(EntityKind::User).unwrap(), 0);
    }

    #[test]
    fn test_count_and_scan_all() {
        let store = store();
        store.insert(EntityKind::User, user_fields("a")).unwrap();
        store.insert(EntityKind::User, user_fields("b")).unwrap();
        assert_eq!(store.count(EntityKind::User).unwrap(), 2);

        let all = store
            .scan_all(
                EntityKind::User,
                ScanOptions {
                    order: ScanOrder::Descending,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].str_field("clerk_id"), Some("b"));
    }
}
