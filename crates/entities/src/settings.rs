//! User settings
//!
//! One settings record per user, keyed by the owning user's id, with a
//! full set of defaults written at creation. Creation is strict;
//! updates patch the supplied fields only.

use std::sync::Arc;
use tabula_core::{EntityKind, FieldValue, Fields, RecordId, Result};
use tabula_engine::{UpsertEngine, UpsertMode};
use tabula_storage::{Record, RecordStore};

use crate::schema::settings;

/// Initial settings; every field is written at creation
#[derive(Debug, Clone)]
pub struct NewSettings {
    /// Automatic sync toggle
    pub auto_sync: bool,
    /// In-app notifications toggle
    pub notifications: bool,
    /// Dark mode toggle
    pub dark_mode: bool,
    /// Email notifications toggle
    pub email_notifications: bool,
    /// Marketing emails toggle
    pub marketing_emails: bool,
    /// Preferred export format
    pub data_export_format: String,
    /// Session timeout, minutes
    pub session_timeout: i64,
    /// Profile visibility level
    pub profile_visibility: String,
    /// Data sharing consent
    pub data_sharing: bool,
    /// Analytics opt-out
    pub analytics_opt_out: bool,
}

impl Default for NewSettings {
    fn default() -> Self {
        Self {
            auto_sync: true,
            notifications: true,
            dark_mode: false,
            email_notifications: true,
            marketing_emails: false,
            data_export_format: "json".to_string(),
            session_timeout: 30,
            profile_visibility: "private".to_string(),
            data_sharing: false,
            analytics_opt_out: false,
        }
    }
}

impl NewSettings {
    fn into_fields(self) -> Fields {
        Fields::new()
            .with(settings::AUTO_SYNC, self.auto_sync)
            .with(settings::NOTIFICATIONS, self.notifications)
            .with(settings::DARK_MODE, self.dark_mode)
            .with(settings::EMAIL_NOTIFICATIONS, self.email_notifications)
            .with(settings::MARKETING_EMAILS, self.marketing_emails)
            .with(settings::DATA_EXPORT_FORMAT, self.data_export_format)
            .with(settings::SESSION_TIMEOUT, self.session_timeout)
            .with(settings::PROFILE_VISIBILITY, self.profile_visibility)
            .with(settings::DATA_SHARING, self.data_sharing)
            .with(settings::ANALYTICS_OPT_OUT, self.analytics_opt_out)
    }
}

/// Partial update to settings; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    /// New automatic sync toggle
    pub auto_sync: Option<bool>,
    /// New in-app notifications toggle
    pub notifications: Option<bool>,
    /// New dark mode toggle
    pub dark_mode: Option<bool>,
    /// New email notifications toggle
    pub email_notifications: Option<bool>,
    /// New marketing emails toggle
    pub marketing_emails: Option<bool>,
    /// New export format
    pub data_export_format: Option<String>,
    /// New session timeout, minutes
    pub session_timeout: Option<i64>,
    /// New profile visibility level
    pub profile_visibility: Option<String>,
    /// New data sharing consent
    pub data_sharing: Option<bool>,
    /// New analytics opt-out
    pub analytics_opt_out: Option<bool>,
}

impl SettingsPatch {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.set_opt(settings::AUTO_SYNC, self.auto_sync);
        fields.set_opt(settings::NOTIFICATIONS, self.notifications);
        fields.set_opt(settings::DARK_MODE, self.dark_mode);
        fields.set_opt(settings::EMAIL_NOTIFICATIONS, self.email_notifications);
        fields.set_opt(settings::MARKETING_EMAILS, self.marketing_emails);
        fields.set_opt(settings::DATA_EXPORT_FORMAT, self.data_export_format);
        fields.set_opt(settings::SESSION_TIMEOUT, self.session_timeout);
        fields.set_opt(settings::PROFILE_VISIBILITY, self.profile_visibility);
        fields.set_opt(settings::DATA_SHARING, self.data_sharing);
        fields.set_opt(settings::ANALYTICS_OPT_OUT, self.analytics_opt_out);
        fields
    }
}

/// Settings facade
#[derive(Debug, Clone)]
pub struct Settings {
    engine: UpsertEngine,
}

impl Settings {
    /// Facade over an existing store
    pub fn new(store: Arc<RecordStore>) -> Self {
        let engine = UpsertEngine::new(
            store,
            EntityKind::Settings,
            settings::BY_USER_ID,
            settings::USER_ID,
            UpsertMode::StrictCreate,
        );
        Self { engine }
    }

    /// Create a user's settings record
    ///
    /// `AlreadyExists` if the user already has one.
    pub fn create(&self, user_id: &str, initial: NewSettings) -> Result<RecordId> {
        self.engine
            .upsert(&FieldValue::from(user_id), initial.into_fields())
    }

    /// Patch a user's settings; `NotFound` if the user has none
    pub fn update(&self, user_id: &str, patch: SettingsPatch) -> Result<RecordId> {
        self.engine
            .update(&FieldValue::from(user_id), &patch.into_fields())
    }

    /// A user's settings, if they exist
    pub fn get(&self, user_id: &str) -> Result<Option<Record>> {
        self.engine.get(&FieldValue::from(user_id))
    }
}
