//! Per-subscriber state
//!
//! One [`UserRecord`] per subscriber, owned exclusively by the
//! [`UserStore`](super::UserStore). Field names in the persisted JSON keep
//! the historical wire format (`UserId`, `StartTime`, ...), so existing state
//! files keep loading across versions.

use std::collections::BTreeSet;

use chrono_tz::Tz;
use log::warn;
use serde::{Deserialize, Serialize};

/// Default delivery window start hour for new subscribers.
pub const DEFAULT_START_HOUR: u32 = 8;
/// Default delivery window end hour for new subscribers.
pub const DEFAULT_END_HOUR: u32 = 22;
/// Default delivery interval in minutes for new subscribers.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 120;
/// Default timezone for new subscribers.
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Outcome of resolving a user's configured timezone name.
///
/// Callers can distinguish a user who configured UTC from one whose timezone
/// name failed to parse and was degraded to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TzResolution {
    /// The configured IANA name resolved.
    Resolved(Tz),
    /// The configured name did not parse; UTC was substituted.
    FellBack,
}

impl TzResolution {
    /// The timezone to use for clock arithmetic.
    pub fn tz(self) -> Tz {
        match self {
            TzResolution::Resolved(tz) => tz,
            TzResolution::FellBack => Tz::UTC,
        }
    }

    /// True when the configured name failed to resolve.
    pub fn fell_back(self) -> bool {
        matches!(self, TzResolution::FellBack)
    }
}

/// State of a single subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "UserId")]
    pub id: u64,
    #[serde(rename = "UserName")]
    pub user_name: String,
    /// Informational greeting text, kept for wire-format compatibility.
    #[serde(rename = "Message")]
    pub message: String,
    /// First hour of the delivery window (inclusive), 0-23.
    #[serde(rename = "StartTime")]
    pub start_hour: u32,
    /// Last hour of the delivery window (exclusive), 0-23.
    #[serde(rename = "EndTime")]
    pub end_hour: u32,
    /// Minutes between deliveries inside the window, 1-1440.
    #[serde(rename = "Interval")]
    pub interval_minutes: u32,
    /// Inactive users are skipped by the scheduler but kept in storage.
    #[serde(rename = "Active")]
    pub active: bool,
    /// IANA timezone name. Resolved lazily; see [`UserRecord::timezone`].
    #[serde(rename = "TimeZone")]
    pub time_zone: String,
    /// Catalog indices already delivered in the current rotation cycle.
    #[serde(rename = "SentPhrasesIndices", default)]
    pub sent_indices: BTreeSet<usize>,
    /// Cached timezone resolution. Derived, rebuildable, never persisted.
    #[serde(skip)]
    tz_cache: Option<TzResolution>,
}

impl UserRecord {
    /// A new subscriber with default settings.
    pub fn new(id: u64, user_name: &str) -> Self {
        UserRecord {
            id,
            user_name: user_name.to_string(),
            message: "💖 You are loved! 💖".to_string(),
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            active: true,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            sent_indices: BTreeSet::new(),
            tz_cache: None,
        }
    }

    /// Resolve the configured timezone, caching the outcome.
    ///
    /// Both success and fallback are cached so a failing name is not
    /// re-resolved on every scheduler tick.
    pub fn timezone(&mut self) -> TzResolution {
        if let Some(resolution) = self.tz_cache {
            return resolution;
        }

        let resolution = match self.time_zone.parse::<Tz>() {
            Ok(tz) => TzResolution::Resolved(tz),
            Err(_) => {
                warn!(
                    "Unknown timezone {:?} for user {} - falling back to UTC",
                    self.time_zone, self.id
                );
                TzResolution::FellBack
            }
        };
        self.tz_cache = Some(resolution);
        resolution
    }

    /// Whether a delivery is due at the given local time.
    ///
    /// Due means: inside the half-open window `[start_hour, end_hour)` and
    /// the minute-of-hour divides evenly by the interval. The window cannot
    /// cross midnight.
    pub fn is_due_at(&self, local_hour: u32, local_minute: u32) -> bool {
        // A zero interval can only come from a hand-edited state file.
        if self.interval_minutes == 0 {
            return false;
        }
        self.start_hour <= local_hour
            && local_hour < self.end_hour
            && local_minute % self.interval_minutes == 0
    }
}
