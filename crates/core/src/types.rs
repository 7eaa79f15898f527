//! Identifier and entity-kind types
//!
//! This module defines:
//! - RecordId: store-assigned unique identifier, immutable once created
//! - EntityKind: the capability key dispatching operations to a table

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a stored record
///
/// A RecordId is a wrapper around a UUID v4, assigned by the store at
/// insert time. It never changes for the lifetime of the record and is
/// never reused. Natural keys (caller-supplied identifiers such as a
/// clerk id) are a separate concept enforced by the upsert engine, not
/// by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new random RecordId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a RecordId from a string representation
    ///
    /// Accepts standard UUID format (with or without hyphens).
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this RecordId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entity kind discriminator
///
/// Every operation is dispatched by EntityKind to the table holding
/// that entity's records. The set of kinds is the platform's fixed
/// schema; adding a kind means adding a table schema, never touching
/// the store or engine code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Platform user accounts (natural key: clerk id)
    User,
    /// Per-user profile details (natural key: user id)
    Profile,
    /// Per-user settings (natural key: user id)
    Settings,
    /// Browser-extension telemetry (natural key: user id)
    ExtensionData,
    /// Append-only activity log entries
    Activity,
    /// User sessions (ended by state transition, never deleted)
    Session,
    /// Platform-wide announcements with an optional active window
    Announcement,
    /// System metric samples
    Metric,
}

impl EntityKind {
    /// All entity kinds, in schema declaration order
    pub const ALL: [EntityKind; 8] = [
        EntityKind::User,
        EntityKind::Profile,
        EntityKind::Settings,
        EntityKind::ExtensionData,
        EntityKind::Activity,
        EntityKind::Session,
        EntityKind::Announcement,
        EntityKind::Metric,
    ];

    /// Stable string name, used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Profile => "profiles",
            EntityKind::Settings => "settings",
            EntityKind::ExtensionData => "extension_data",
            EntityKind::Activity => "activities",
            EntityKind::Session => "sessions",
            EntityKind::Announcement => "announcements",
            EntityKind::Metric => "metrics",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
