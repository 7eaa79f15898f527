//! User sessions
//!
//! A session starts active and ends exactly once. Ending is a state
//! transition, not a deletion: the record keeps its history, the
//! `is_active` flag flips to false and `ended_at` is stamped.

use std::sync::Arc;
use tabula_core::{EntityKind, FieldValue, Fields, RecordId, Result};
use tabula_storage::{Record, RecordStore, ScanOptions, TimeField};

use crate::schema::sessions;

/// Payload for starting a session
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Owning user's identity
    pub user_id: String,
    /// Client device id
    pub device_id: Option<String>,
    /// Client user agent
    pub user_agent: Option<String>,
    /// Client address
    pub ip_address: Option<String>,
    /// Coarse location
    pub location: Option<String>,
    /// Originating surface
    pub source: Option<String>,
}

impl NewSession {
    /// Minimal session: just the owning user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            device_id: None,
            user_agent: None,
            ip_address: None,
            location: None,
            source: None,
        }
    }
}

/// Session facade
#[derive(Debug, Clone)]
pub struct Sessions {
    store: Arc<RecordStore>,
}

impl Sessions {
    /// Facade over an existing store
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Start a session for a user
    ///
    /// The new record is active and stamped with the start time. A user
    /// may hold any number of concurrent sessions.
    pub fn start(&self, session: NewSession) -> Result<RecordId> {
        self.store.write(EntityKind::Session, |table, now| {
            let mut fields = Fields::new()
                .with(sessions::USER_ID, session.user_id)
                .with(sessions::STARTED_AT, now)
                .with(sessions::IS_ACTIVE, true);
            fields.set_opt(sessions::DEVICE_ID, session.device_id);
            fields.set_opt(sessions::USER_AGENT, session.user_agent);
            fields.set_opt(sessions::IP_ADDRESS, session.ip_address);
            fields.set_opt(sessions::LOCATION, session.location);
            fields.set_opt(sessions::SOURCE, session.source);
            table.insert(fields, now)
        })
    }

    /// End a session
    ///
    /// Flips `is_active` to false and stamps `ended_at`. `NotFound` if
    /// the id does not exist. Ending an already ended session just
    /// re-stamps `ended_at`.
    pub fn end(&self, id: RecordId) -> Result<()> {
        self.store.write(EntityKind::Session, |table, now| {
            let patch = Fields::new()
                .with(sessions::IS_ACTIVE, false)
                .with(sessions::ENDED_AT, now);
            table.patch(id, &patch, now)
        })
    }

    /// A user's currently active sessions, newest first
    pub fn active_for_user(&self, user_id: &str) -> Result<Vec<Record>> {
        let mut records = self.for_user(user_id)?;
        records.retain(|r| r.bool_field(sessions::IS_ACTIVE) == Some(true));
        Ok(records)
    }

    /// All of a user's sessions, newest start first
    pub fn for_user(&self, user_id: &str) -> Result<Vec<Record>> {
        self.store.scan_by_index(
            EntityKind::Session,
            sessions::BY_USER_ID,
            &FieldValue::from(user_id),
            ScanOptions::descending().sorted_by(TimeField::Field(sessions::STARTED_AT)),
        )
    }

    /// Point lookup by session id
    pub fn get(&self, id: RecordId) -> Result<Option<Record>> {
        self.store.get_by_id(EntityKind::Session, id)
    }
}
