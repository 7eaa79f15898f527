//! Tabula - Embedded record store for a user-platform backend
//!
//! Tabula is the data-access layer of a multi-entity user platform:
//! accounts, profiles, settings, extension telemetry, activity logs,
//! sessions, announcements and metrics, all held in one in-process
//! indexed record store.
//!
//! # Quick Start
//!
//! ```ignore
//! use tabula::{NewUser, Platform};
//!
//! // Fresh platform with every table registered
//! let platform = Platform::new();
//!
//! // Create a user keyed by their identity-provider id
//! platform.users().create(NewUser {
//!     clerk_id: "clerk_123".into(),
//!     email: "alice@example.com".into(),
//!     first_name: Some("Alice".into()),
//!     last_name: None,
//!     image_url: None,
//! })?;
//!
//! // Look them up again
//! let user = platform.users().get_by_clerk_id("clerk_123")?;
//! ```
//!
//! # Architecture
//!
//! [`Platform`] bundles typed entity facades over one shared
//! [`RecordStore`]. The facades bind the generic engines (unique-key
//! upsert, active-set query, recency query) to each entity's schema;
//! applications normally only touch the facade layer.

pub use tabula_core::{
    EntityKind, Error, FieldValue, Fields, RecordId, Result, Timestamp,
};
pub use tabula_engine::{
    ActiveSetQuery, ActiveWindow, QueryBounds, RecencyQuery, UpsertEngine, UpsertMode,
};
pub use tabula_entities::{
    platform_schema, Activities, ActivityEvent, AnnouncementPatch, Announcements, ExtensionPayload,
    ExtensionSync, MetricSample, Metrics, NewAnnouncement, NewProfile, NewSession, NewSettings,
    NewUser, Platform, ProfilePatch, Profiles, Sessions, Settings, SettingsPatch, UserPatch, Users,
};
pub use tabula_storage::{
    IndexDef, Record, RecordStore, ScanOptions, ScanOrder, TableSchema, TimeField,
};
