//! Typed entity facades for the Tabula platform store
//!
//! One facade per entity family, each a thin, stateless wrapper that
//! binds the generic engines to that family's schema:
//!
//! - [`Users`], [`Profiles`], [`Settings`]: account data keyed by a
//!   caller-supplied identity (strict-create for profile/settings)
//! - [`ExtensionSync`]: telemetry upsert in sync mode
//! - [`Activities`]: append-only activity log
//! - [`Sessions`]: session lifecycle (ended, never deleted)
//! - [`Announcements`]: windowed announcements with an active set
//! - [`Metrics`]: metric samples with recency/range queries
//!
//! [`Platform`] bundles a store built from [`schema::platform_schema`]
//! with all eight facades.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activity;
pub mod announcements;
pub mod extension;
pub mod metrics;
pub mod platform;
pub mod profiles;
pub mod schema;
pub mod sessions;
pub mod settings;
pub mod users;

pub use activity::{Activities, ActivityEvent};
pub use announcements::{AnnouncementPatch, Announcements, NewAnnouncement};
pub use extension::{ExtensionPayload, ExtensionSync};
pub use metrics::{MetricSample, Metrics};
pub use platform::Platform;
pub use profiles::{NewProfile, ProfilePatch, Profiles};
pub use schema::platform_schema;
pub use sessions::{NewSession, Sessions};
pub use settings::{NewSettings, Settings, SettingsPatch};
pub use users::{NewUser, UserPatch, Users};
