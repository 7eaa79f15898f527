//! The assembled platform
//!
//! One constructor that registers every table and wires every facade
//! to a shared store. Callers hold a `Platform` and reach entities
//! through its accessors; all facades see the same data.

use std::sync::Arc;
use tabula_storage::RecordStore;
use tracing::info;

use crate::activity::Activities;
use crate::announcements::Announcements;
use crate::extension::ExtensionSync;
use crate::metrics::Metrics;
use crate::profiles::Profiles;
use crate::schema::platform_schema;
use crate::sessions::Sessions;
use crate::settings::Settings;
use crate::users::Users;

/// Every entity facade over one shared record store
#[derive(Debug, Clone)]
pub struct Platform {
    store: Arc<RecordStore>,
    users: Users,
    profiles: Profiles,
    settings: Settings,
    extension: ExtensionSync,
    activities: Activities,
    sessions: Sessions,
    announcements: Announcements,
    metrics: Metrics,
}

impl Platform {
    /// Fresh platform with all tables registered and empty
    pub fn new() -> Self {
        Self::with_store(Arc::new(RecordStore::with_schemas(platform_schema())))
    }

    /// Platform over an existing store
    ///
    /// The store must already have the platform's tables registered,
    /// as [`platform_schema`] does.
    pub fn with_store(store: Arc<RecordStore>) -> Self {
        info!(target: "tabula::platform", "platform facade attached");
        Self {
            users: Users::new(Arc::clone(&store)),
            profiles: Profiles::new(Arc::clone(&store)),
            settings: Settings::new(Arc::clone(&store)),
            extension: ExtensionSync::new(Arc::clone(&store)),
            activities: Activities::new(Arc::clone(&store)),
            sessions: Sessions::new(Arc::clone(&store)),
            announcements: Announcements::new(Arc::clone(&store)),
            metrics: Metrics::new(Arc::clone(&store)),
            store,
        }
    }

    /// The shared record store
    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// User accounts
    pub fn users(&self) -> &Users {
        &self.users
    }

    /// User profiles
    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    /// User settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Extension telemetry
    pub fn extension(&self) -> &ExtensionSync {
        &self.extension
    }

    /// Activity log
    pub fn activities(&self) -> &Activities {
        &self.activities
    }

    /// User sessions
    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Announcements
    pub fn announcements(&self) -> &Announcements {
        &self.announcements
    }

    /// Metrics
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}
