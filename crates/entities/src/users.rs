//! User accounts
//!
//! Users are keyed by the identity provider's id (`clerk_id`). Creation
//! is strict: a second create for the same clerk id is an error, not a
//! silent merge. Updates are partial patches addressed by clerk id.

use std::sync::Arc;
use tabula_core::{EntityKind, FieldValue, Fields, RecordId, Result};
use tabula_engine::{UpsertEngine, UpsertMode};
use tabula_storage::{Record, RecordStore, ScanOptions};

use crate::schema::users;

/// Payload for creating a user account
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Identity provider's user id; the natural key
    pub clerk_id: String,
    /// Email address
    pub email: String,
    /// Given name, if known
    pub first_name: Option<String>,
    /// Family name, if known
    pub last_name: Option<String>,
    /// Avatar URL, if known
    pub image_url: Option<String>,
}

/// Partial update to a user account; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// New email address
    pub email: Option<String>,
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
    /// New avatar URL
    pub image_url: Option<String>,
}

impl UserPatch {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.set_opt(users::EMAIL, self.email);
        fields.set_opt(users::FIRST_NAME, self.first_name);
        fields.set_opt(users::LAST_NAME, self.last_name);
        fields.set_opt(users::IMAGE_URL, self.image_url);
        fields
    }
}

/// User account facade
#[derive(Debug, Clone)]
pub struct Users {
    store: Arc<RecordStore>,
    engine: UpsertEngine,
}

impl Users {
    /// Facade over an existing store
    pub fn new(store: Arc<RecordStore>) -> Self {
        let engine = UpsertEngine::new(
            Arc::clone(&store),
            EntityKind::User,
            users::BY_CLERK_ID,
            users::CLERK_ID,
            UpsertMode::StrictCreate,
        );
        Self { store, engine }
    }

    /// Create a user account
    ///
    /// `AlreadyExists` if a user already holds the clerk id.
    pub fn create(&self, user: NewUser) -> Result<RecordId> {
        let key = FieldValue::from(user.clerk_id);
        let mut fields = Fields::new().with(users::EMAIL, user.email);
        fields.set_opt(users::FIRST_NAME, user.first_name);
        fields.set_opt(users::LAST_NAME, user.last_name);
        fields.set_opt(users::IMAGE_URL, user.image_url);
        self.engine.upsert(&key, fields)
    }

    /// Patch the user holding a clerk id
    ///
    /// `NotFound` if no user holds it. Supplied fields replace their
    /// previous values; absent fields stay untouched.
    pub fn update(&self, clerk_id: &str, patch: UserPatch) -> Result<RecordId> {
        self.engine
            .update(&FieldValue::from(clerk_id), &patch.into_fields())
    }

    /// The user holding a clerk id, if any
    pub fn get_by_clerk_id(&self, clerk_id: &str) -> Result<Option<Record>> {
        self.engine.get(&FieldValue::from(clerk_id))
    }

    /// Point lookup by record id
    pub fn get(&self, id: RecordId) -> Result<Option<Record>> {
        self.store.get_by_id(EntityKind::User, id)
    }

    /// Users registered under an email address
    ///
    /// Email is not unique, so this can return several accounts.
    pub fn find_by_email(&self, email: &str) -> Result<Vec<Record>> {
        self.store.scan_by_index(
            EntityKind::User,
            users::BY_EMAIL,
            &FieldValue::from(email),
            ScanOptions::ascending(),
        )
    }
}
