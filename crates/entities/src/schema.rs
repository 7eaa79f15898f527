//! The platform's table schemas
//!
//! Field names and index declarations for all eight entity kinds.
//! This is the single place the schema lives; facades refer to these
//! consts and never spell field names inline.

use tabula_core::EntityKind;
use tabula_storage::{IndexDef, TableSchema};

/// User account fields and indexes
pub mod users {
    /// Identity provider's user id (natural key)
    pub const CLERK_ID: &str = "clerk_id";
    /// Email address
    pub const EMAIL: &str = "email";
    /// Optional given name
    pub const FIRST_NAME: &str = "first_name";
    /// Optional family name
    pub const LAST_NAME: &str = "last_name";
    /// Optional avatar URL
    pub const IMAGE_URL: &str = "image_url";
    /// Unique natural-key index
    pub const BY_CLERK_ID: &str = "by_clerk_id";
    /// Email lookup index (not unique)
    pub const BY_EMAIL: &str = "by_email";
}

/// Profile fields and indexes
pub mod profiles {
    /// Owning user's identity (natural key)
    pub const USER_ID: &str = "user_id";
    /// Free-form biography
    pub const BIO: &str = "bio";
    /// IANA timezone name
    pub const TIMEZONE: &str = "timezone";
    /// BCP-47 locale
    pub const LOCALE: &str = "locale";
    /// Unique natural-key index
    pub const BY_USER_ID: &str = "by_user_id";
}

/// Settings fields and indexes
pub mod settings {
    /// Owning user's identity (natural key)
    pub const USER_ID: &str = "user_id";
    /// Automatic sync toggle
    pub const AUTO_SYNC: &str = "auto_sync";
    /// In-app notifications toggle
    pub const NOTIFICATIONS: &str = "notifications";
    /// Dark mode toggle
    pub const DARK_MODE: &str = "dark_mode";
    /// Email notifications toggle
    pub const EMAIL_NOTIFICATIONS: &str = "email_notifications";
    /// Marketing emails toggle
    pub const MARKETING_EMAILS: &str = "marketing_emails";
    /// Preferred export format
    pub const DATA_EXPORT_FORMAT: &str = "data_export_format";
    /// Session timeout, minutes
    pub const SESSION_TIMEOUT: &str = "session_timeout";
    /// Profile visibility level
    pub const PROFILE_VISIBILITY: &str = "profile_visibility";
    /// Data sharing consent
    pub const DATA_SHARING: &str = "data_sharing";
    /// Analytics opt-out
    pub const ANALYTICS_OPT_OUT: &str = "analytics_opt_out";
    /// Unique natural-key index
    pub const BY_USER_ID: &str = "by_user_id";
}

/// Extension telemetry fields and indexes
pub mod extension {
    /// Owning user's identity (natural key)
    pub const USER_ID: &str = "user_id";
    /// Extension version string
    pub const VERSION: &str = "version";
    /// Last sync time, millis
    pub const LAST_SYNC_AT: &str = "last_sync_at";
    /// Last sync outcome
    pub const SYNC_STATUS: &str = "sync_status";
    /// Usage counter for the day
    pub const DAILY_USAGE: &str = "daily_usage";
    /// Feature names used
    pub const FEATURES_USED: &str = "features_used";
    /// Opaque JSON payload
    pub const CUSTOM_DATA: &str = "custom_data";
    /// Unique natural-key index
    pub const BY_USER_ID: &str = "by_user_id";
}

/// Activity log fields and indexes
pub mod activity {
    /// Acting user's identity
    pub const USER_ID: &str = "user_id";
    /// Action performed
    pub const ACTION: &str = "action";
    /// Resource acted on
    pub const RESOURCE: &str = "resource";
    /// Opaque JSON payload
    pub const METADATA: &str = "metadata";
    /// Originating surface
    pub const SOURCE: &str = "source";
    /// Client address
    pub const IP_ADDRESS: &str = "ip_address";
    /// Client user agent
    pub const USER_AGENT: &str = "user_agent";
    /// Per-user index
    pub const BY_USER_ID: &str = "by_user_id";
    /// Per-action index
    pub const BY_ACTION: &str = "by_action";
}

/// Session fields and indexes
pub mod sessions {
    /// Owning user's identity
    pub const USER_ID: &str = "user_id";
    /// Client device id
    pub const DEVICE_ID: &str = "device_id";
    /// Client user agent
    pub const USER_AGENT: &str = "user_agent";
    /// Client address
    pub const IP_ADDRESS: &str = "ip_address";
    /// Coarse location
    pub const LOCATION: &str = "location";
    /// Originating surface
    pub const SOURCE: &str = "source";
    /// Session start, millis
    pub const STARTED_AT: &str = "started_at";
    /// Session end, millis; absent while active
    pub const ENDED_AT: &str = "ended_at";
    /// Whether the session is live
    pub const IS_ACTIVE: &str = "is_active";
    /// Per-user index
    pub const BY_USER_ID: &str = "by_user_id";
    /// Live-session index
    pub const BY_ACTIVE: &str = "by_active";
}

/// Announcement fields and indexes
pub mod announcements {
    /// Headline
    pub const TITLE: &str = "title";
    /// Body text
    pub const CONTENT: &str = "content";
    /// Severity: info, warning, alert
    pub const KIND: &str = "kind";
    /// Display priority
    pub const PRIORITY: &str = "priority";
    /// Window start, millis; absent = unbounded
    pub const START_DATE: &str = "start_date";
    /// Window end, millis; absent = unbounded
    pub const END_DATE: &str = "end_date";
    /// Stored activity flag (computed at write time)
    pub const IS_ACTIVE: &str = "is_active";
    /// Target audience: all, premium, free
    pub const AUDIENCE: &str = "audience";
    /// Stored-flag index
    pub const BY_ACTIVE: &str = "by_active";
    /// Priority index
    pub const BY_PRIORITY: &str = "by_priority";
}

/// Metric fields and indexes
pub mod metrics {
    /// Metric name (query key)
    pub const NAME: &str = "name";
    /// Sample value
    pub const VALUE: &str = "value";
    /// Unit of measure
    pub const UNIT: &str = "unit";
    /// Opaque JSON tag payload
    pub const TAGS: &str = "tags";
    /// Sample time, millis (caller-supplied)
    pub const TIMESTAMP: &str = "timestamp";
    /// Aggregation period: hourly, daily, ...
    pub const PERIOD: &str = "period";
    /// Per-name index
    pub const BY_NAME: &str = "by_name";
    /// Sample-time index
    pub const BY_TIMESTAMP: &str = "by_timestamp";
}

const USER_INDEXES: [IndexDef; 2] = [
    IndexDef::unique(users::BY_CLERK_ID, users::CLERK_ID),
    IndexDef::new(users::BY_EMAIL, users::EMAIL),
];

const PROFILE_INDEXES: [IndexDef; 1] = [IndexDef::unique(profiles::BY_USER_ID, profiles::USER_ID)];

const SETTINGS_INDEXES: [IndexDef; 1] = [IndexDef::unique(settings::BY_USER_ID, settings::USER_ID)];

const EXTENSION_INDEXES: [IndexDef; 1] =
    [IndexDef::unique(extension::BY_USER_ID, extension::USER_ID)];

const ACTIVITY_INDEXES: [IndexDef; 2] = [
    IndexDef::new(activity::BY_USER_ID, activity::USER_ID),
    IndexDef::new(activity::BY_ACTION, activity::ACTION),
];

const SESSION_INDEXES: [IndexDef; 2] = [
    IndexDef::new(sessions::BY_USER_ID, sessions::USER_ID),
    IndexDef::new(sessions::BY_ACTIVE, sessions::IS_ACTIVE),
];

const ANNOUNCEMENT_INDEXES: [IndexDef; 2] = [
    IndexDef::new(announcements::BY_ACTIVE, announcements::IS_ACTIVE),
    IndexDef::new(announcements::BY_PRIORITY, announcements::PRIORITY),
];

const METRIC_INDEXES: [IndexDef; 2] = [
    IndexDef::new(metrics::BY_NAME, metrics::NAME),
    IndexDef::new(metrics::BY_TIMESTAMP, metrics::TIMESTAMP),
];

/// The platform's full schema, one table per entity kind
pub fn platform_schema() -> [TableSchema; 8] {
    [
        TableSchema::new(EntityKind::User, &USER_INDEXES),
        TableSchema::new(EntityKind::Profile, &PROFILE_INDEXES),
        TableSchema::new(EntityKind::Settings, &SETTINGS_INDEXES),
        TableSchema::new(EntityKind::ExtensionData, &EXTENSION_INDEXES),
        TableSchema::new(EntityKind::Activity, &ACTIVITY_INDEXES),
        TableSchema::new(EntityKind::Session, &SESSION_INDEXES),
        TableSchema::new(EntityKind::Announcement, &ANNOUNCEMENT_INDEXES),
        TableSchema::new(EntityKind::Metric, &METRIC_INDEXES),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_every_kind() {
        let schemas = platform_schema();
        for kind in EntityKind::ALL {
            assert!(
                schemas.iter().any(|s| s.kind == kind),
                "no schema for {kind}"
            );
        }
    }

    #[test]
    fn test_natural_keys_are_unique_indexes() {
        let schemas = platform_schema();
        for (kind, index) in [
            (EntityKind::User, users::BY_CLERK_ID),
            (EntityKind::Profile, profiles::BY_USER_ID),
            (EntityKind::Settings, settings::BY_USER_ID),
            (EntityKind::ExtensionData, extension::BY_USER_ID),
        ] {
            let schema = schemas.iter().find(|s| s.kind == kind).unwrap();
            assert!(schema.index(index).unwrap().unique, "{kind}/{index}");
        }
    }

    #[test]
    fn test_log_style_kinds_have_no_unique_index() {
        let schemas = platform_schema();
        for kind in [
            EntityKind::Activity,
            EntityKind::Session,
            EntityKind::Announcement,
            EntityKind::Metric,
        ] {
            let schema = schemas.iter().find(|s| s.kind == kind).unwrap();
            assert!(schema.indexes.iter().all(|i| !i.unique), "{kind}");
        }
    }
}
