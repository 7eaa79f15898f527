//! User profiles
//!
//! One profile per user, keyed by the owning user's id. Creation is
//! strict; updates patch the supplied fields only.

use std::sync::Arc;
use tabula_core::{EntityKind, FieldValue, Fields, RecordId, Result};
use tabula_engine::{UpsertEngine, UpsertMode};
use tabula_storage::{Record, RecordStore};

use crate::schema::profiles;

/// Payload for creating a profile
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    /// Biography text
    pub bio: Option<String>,
    /// IANA timezone name
    pub timezone: Option<String>,
    /// BCP-47 locale
    pub locale: Option<String>,
}

/// Partial update to a profile; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    /// New biography text
    pub bio: Option<String>,
    /// New timezone
    pub timezone: Option<String>,
    /// New locale
    pub locale: Option<String>,
}

impl ProfilePatch {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.set_opt(profiles::BIO, self.bio);
        fields.set_opt(profiles::TIMEZONE, self.timezone);
        fields.set_opt(profiles::LOCALE, self.locale);
        fields
    }
}

/// Profile facade
#[derive(Debug, Clone)]
pub struct Profiles {
    engine: UpsertEngine,
}

impl Profiles {
    /// Facade over an existing store
    pub fn new(store: Arc<RecordStore>) -> Self {
        let engine = UpsertEngine::new(
            store,
            EntityKind::Profile,
            profiles::BY_USER_ID,
            profiles::USER_ID,
            UpsertMode::StrictCreate,
        );
        Self { engine }
    }

    /// Create a user's profile
    ///
    /// `AlreadyExists` if the user already has one.
    pub fn create(&self, user_id: &str, profile: NewProfile) -> Result<RecordId> {
        let mut fields = Fields::new();
        fields.set_opt(profiles::BIO, profile.bio);
        fields.set_opt(profiles::TIMEZONE, profile.timezone);
        fields.set_opt(profiles::LOCALE, profile.locale);
        self.engine.upsert(&FieldValue::from(user_id), fields)
    }

    /// Patch a user's profile; `NotFound` if the user has none
    pub fn update(&self, user_id: &str, patch: ProfilePatch) -> Result<RecordId> {
        self.engine
            .update(&FieldValue::from(user_id), &patch.into_fields())
    }

    /// A user's profile, if one exists
    pub fn get(&self, user_id: &str) -> Result<Option<Record>> {
        self.engine.get(&FieldValue::from(user_id))
    }
}
