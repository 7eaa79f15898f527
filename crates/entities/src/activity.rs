//! Activity log
//!
//! Append-only audit trail of user actions. Events are never patched
//! or deleted; queries read them newest-first by insert time.

use std::sync::Arc;
use tabula_core::{EntityKind, FieldValue, Fields, RecordId, Result};
use tabula_engine::{QueryBounds, RecencyQuery};
use tabula_storage::{Record, RecordStore, TimeField};

use crate::schema::activity;

/// Default cap on the cross-user recent feed
const DEFAULT_LIMIT: usize = 100;

fn bounds_for(limit: Option<usize>) -> QueryBounds {
    match limit {
        Some(n) => QueryBounds::most_recent(n),
        None => QueryBounds::all(),
    }
}

/// One logged action
#[derive(Debug, Clone)]
pub struct ActivityEvent {
    /// Acting user's identity
    pub user_id: String,
    /// The action performed, e.g. "login" or "export"
    pub action: String,
    /// Resource the action touched
    pub resource: Option<String>,
    /// Opaque JSON payload, stored as a string
    pub metadata: Option<String>,
    /// Originating surface, e.g. "web" or "extension"
    pub source: Option<String>,
    /// Client address
    pub ip_address: Option<String>,
    /// Client user agent
    pub user_agent: Option<String>,
}

impl ActivityEvent {
    /// Minimal event: a user and an action
    pub fn new(user_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            action: action.into(),
            resource: None,
            metadata: None,
            source: None,
            ip_address: None,
            user_agent: None,
        }
    }

    fn into_fields(self) -> Fields {
        let mut fields = Fields::new()
            .with(activity::USER_ID, self.user_id)
            .with(activity::ACTION, self.action);
        fields.set_opt(activity::RESOURCE, self.resource);
        fields.set_opt(activity::METADATA, self.metadata);
        fields.set_opt(activity::SOURCE, self.source);
        fields.set_opt(activity::IP_ADDRESS, self.ip_address);
        fields.set_opt(activity::USER_AGENT, self.user_agent);
        fields
    }
}

/// Activity log facade
#[derive(Debug, Clone)]
pub struct Activities {
    store: Arc<RecordStore>,
    by_user: RecencyQuery,
    by_action: RecencyQuery,
}

impl Activities {
    /// Facade over an existing store
    pub fn new(store: Arc<RecordStore>) -> Self {
        let by_user = RecencyQuery::new(
            Arc::clone(&store),
            EntityKind::Activity,
            activity::BY_USER_ID,
            TimeField::Created,
        );
        let by_action = RecencyQuery::new(
            Arc::clone(&store),
            EntityKind::Activity,
            activity::BY_ACTION,
            TimeField::Created,
        );
        Self {
            store,
            by_user,
            by_action,
        }
    }

    /// Append an event to the log
    pub fn log(&self, event: ActivityEvent) -> Result<RecordId> {
        self.store.insert(EntityKind::Activity, event.into_fields())
    }

    /// A user's events, newest first. `None` returns the full history.
    pub fn for_user(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Record>> {
        self.by_user
            .by_key(&FieldValue::from(user_id), bounds_for(limit))
    }

    /// Events for one action across all users, newest first. `None`
    /// returns every matching event.
    pub fn by_action(&self, action: &str, limit: Option<usize>) -> Result<Vec<Record>> {
        self.by_action
            .by_key(&FieldValue::from(action), bounds_for(limit))
    }

    /// The newest events across all users
    pub fn recent(&self, limit: Option<usize>) -> Result<Vec<Record>> {
        self.by_user
            .recent(QueryBounds::most_recent(limit.unwrap_or(DEFAULT_LIMIT)))
    }
}
