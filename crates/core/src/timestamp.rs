//! Millisecond-precision timestamp type
//!
//! Timestamps are stored as milliseconds since Unix epoch
//! (1970-01-01 00:00:00 UTC). Milliseconds are the store's time unit:
//! record bookkeeping (`created_at` / `updated_at`), session windows,
//! announcement windows and metric samples all use it.
//!
//! Never expose raw arithmetic. Use explicit constructors:
//!
//! ```
//! use tabula_core::Timestamp;
//!
//! let now = Timestamp::now();
//! let fixed = Timestamp::from_millis(1_700_000_000_000);
//! ```

use serde::{Deserialize, Serialize};

/// Millisecond-precision timestamp
///
/// Represents a point in time as milliseconds since Unix epoch.
/// This is the canonical time representation in the store.
///
/// ## Invariants
///
/// - Timestamps are always non-negative (u64)
/// - Timestamps are comparable and orderable
/// - The zero timestamp represents Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Maximum representable timestamp
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    /// Create a timestamp for the current moment
    ///
    /// Uses the system wall clock. Returns epoch (0) if the clock is
    /// before Unix epoch (e.g. after an NTP adjustment).
    pub fn now() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        Timestamp(millis.max(0) as u64)
    }

    /// Create a timestamp from milliseconds since Unix epoch
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Milliseconds since Unix epoch
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `millis`
    ///
    /// Saturates at `Timestamp::MAX`.
    pub const fn plus_millis(&self, millis: u64) -> Self {
        Timestamp(self.0.saturating_add(millis))
    }

    /// This timestamp shifted backward by `millis`
    ///
    /// Saturates at epoch.
    pub const fn minus_millis(&self, millis: u64) -> Self {
        Timestamp(self.0.saturating_sub(millis))
    }
}
