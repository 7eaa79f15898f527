//! Extension telemetry
//!
//! Each user has at most one extension record, kept current by
//! sync-mode upserts: the first sync inserts, later syncs patch the
//! supplied fields and leave the rest alone. Fields absent from a
//! payload are never cleared.

use std::sync::Arc;
use tabula_core::{EntityKind, FieldValue, Fields, RecordId, Result, Timestamp};
use tabula_engine::{UpsertEngine, UpsertMode};
use tabula_storage::{Record, RecordStore, ScanOptions};

use crate::schema::extension;

/// One sync payload from the extension; all fields optional
#[derive(Debug, Clone, Default)]
pub struct ExtensionPayload {
    /// Extension version string
    pub version: Option<String>,
    /// When the extension last synced, millis
    pub last_sync_at: Option<Timestamp>,
    /// Outcome of the last sync
    pub sync_status: Option<String>,
    /// Usage counter for the day
    pub daily_usage: Option<i64>,
    /// Feature names used since the last sync
    pub features_used: Option<Vec<String>>,
    /// Opaque JSON payload, stored as a string
    pub custom_data: Option<String>,
}

impl ExtensionPayload {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.set_opt(extension::VERSION, self.version);
        fields.set_opt(extension::LAST_SYNC_AT, self.last_sync_at);
        fields.set_opt(extension::SYNC_STATUS, self.sync_status);
        fields.set_opt(extension::DAILY_USAGE, self.daily_usage);
        fields.set_opt(extension::FEATURES_USED, self.features_used);
        fields.set_opt(extension::CUSTOM_DATA, self.custom_data);
        fields
    }
}

/// Extension telemetry facade
#[derive(Debug, Clone)]
pub struct ExtensionSync {
    store: Arc<RecordStore>,
    engine: UpsertEngine,
}

impl ExtensionSync {
    /// Facade over an existing store
    pub fn new(store: Arc<RecordStore>) -> Self {
        let engine = UpsertEngine::new(
            Arc::clone(&store),
            EntityKind::ExtensionData,
            extension::BY_USER_ID,
            extension::USER_ID,
            UpsertMode::Sync,
        );
        Self { store, engine }
    }

    /// Record a sync from a user's extension
    ///
    /// Inserts on first contact, patches thereafter. Returns the id of
    /// the user's extension record either way.
    pub fn sync(&self, user_id: &str, payload: ExtensionPayload) -> Result<RecordId> {
        self.engine
            .upsert(&FieldValue::from(user_id), payload.into_fields())
    }

    /// A user's extension record, if the extension has ever synced
    pub fn get(&self, user_id: &str) -> Result<Option<Record>> {
        self.engine.get(&FieldValue::from(user_id))
    }

    /// Every extension record, in insertion order
    pub fn all(&self) -> Result<Vec<Record>> {
        self.store
            .scan_all(EntityKind::ExtensionData, ScanOptions::ascending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::platform_schema;

    fn sync() -> ExtensionSync {
        ExtensionSync::new(Arc::new(RecordStore::with_schemas(platform_schema())))
    }

    #[test]
    fn test_first_sync_inserts() {
        let sync = sync();
        let id = sync
            .sync(
                "user_1",
                ExtensionPayload {
                    version: Some("1.2.0".to_string()),
                    daily_usage: Some(3),
                    ..ExtensionPayload::default()
                },
            )
            .unwrap();

        let record = sync.get("user_1").unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.str_field("user_id"), Some("user_1"));
        assert_eq!(record.str_field("version"), Some("1.2.0"));
        assert_eq!(record.i64_field("daily_usage"), Some(3));
    }

    #[test]
    fn test_resync_merges_into_same_record() {
        let sync = sync();
        let first = sync
            .sync(
                "user_1",
                ExtensionPayload {
                    version: Some("1.2.0".to_string()),
                    sync_status: Some("ok".to_string()),
                    ..ExtensionPayload::default()
                },
            )
            .unwrap();
        let second = sync
            .sync(
                "user_1",
                ExtensionPayload {
                    daily_usage: Some(7),
                    ..ExtensionPayload::default()
                },
            )
            .unwrap();
        assert_eq!(first, second);

        // Old fields survive a payload that omits them
        let record = sync.get("user_1").unwrap().unwrap();
        assert_eq!(record.str_field("version"), Some("1.2.0"));
        assert_eq!(record.str_field("sync_status"), Some("ok"));
        assert_eq!(record.i64_field("daily_usage"), Some(7));
    }

    #[test]
    fn test_custom_data_round_trips_as_json_string() {
        let sync = sync();
        let payload = serde_json::json!({ "theme": "dark", "shortcuts": 12 });
        sync.sync(
            "user_1",
            ExtensionPayload {
                custom_data: Some(payload.to_string()),
                ..ExtensionPayload::default()
            },
        )
        .unwrap();

        let record = sync.get("user_1").unwrap().unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(record.str_field("custom_data").unwrap()).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_features_used_stored_as_array() {
        let sync = sync();
        sync.sync(
            "user_1",
            ExtensionPayload {
                features_used: Some(vec!["autocomplete".to_string(), "lint".to_string()]),
                ..ExtensionPayload::default()
            },
        )
        .unwrap();

        let record = sync.get("user_1").unwrap().unwrap();
        let features = record.field("features_used").unwrap().as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].as_str(), Some("autocomplete"));
    }

    #[test]
    fn test_all_lists_one_record_per_user() {
        let sync = sync();
        for user in ["a", "b", "c"] {
            sync.sync(user, ExtensionPayload::default()).unwrap();
            // A second sync must not add a record
            sync.sync(user, ExtensionPayload::default()).unwrap();
        }
        let all = sync.all().unwrap();
        assert_eq!(all.len(), 3);
        let ids: Vec<_> = all.iter().filter_map(|r| r.str_field("user_id")).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
