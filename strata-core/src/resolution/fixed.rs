use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::Resolution;
use crate::StrataError;

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 604_800;

// The epoch fell on a Thursday; weeks are anchored four days later, on Monday.
const WEEK_OFFSET: i64 = 4 * DAY;

/// Fixed-length buckets: `MINUTE -> HOUR -> DAY -> WEEK`.
///
/// Rounding is integer arithmetic on seconds since the epoch. Weeks start on
/// Monday 00:00 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DefaultResolution {
    /// 60 seconds.
    Minute,
    /// 60 minutes.
    Hour,
    /// 24 hours.
    Day,
    /// 7 days, Monday-aligned.
    Week,
}

const ALL: [DefaultResolution; 4] = [
    DefaultResolution::Minute,
    DefaultResolution::Hour,
    DefaultResolution::Day,
    DefaultResolution::Week,
];

const LOWER: [Option<DefaultResolution>; 4] = [
    None,
    Some(DefaultResolution::Minute),
    Some(DefaultResolution::Hour),
    Some(DefaultResolution::Day),
];

impl DefaultResolution {
    /// Bucket length in seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::Minute => MINUTE,
            Self::Hour => HOUR,
            Self::Day => DAY,
            Self::Week => WEEK,
        }
    }

    const fn offset(self) -> i64 {
        match self {
            Self::Week => WEEK_OFFSET,
            _ => 0,
        }
    }

    fn floor_secs(self, secs: i64) -> i64 {
        secs - (secs - self.offset()).rem_euclid(self.seconds())
    }
}

impl Resolution for DefaultResolution {
    fn name(&self) -> &'static str {
        match self {
            Self::Minute => "MINUTE",
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Week => "WEEK",
        }
    }

    fn lower(&self) -> Option<Self> {
        LOWER[*self as usize]
    }

    fn round_down(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        DateTime::from_timestamp(self.floor_secs(t.timestamp()), 0)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn next(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        self.round_down(t)
            .checked_add_signed(TimeDelta::seconds(self.seconds()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn all() -> &'static [Self] {
        &ALL
    }

    fn finest() -> Self {
        Self::Minute
    }

    fn coarsest() -> Self {
        Self::Week
    }
}

impl fmt::Display for DefaultResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DefaultResolution {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StrataError::InvalidArg(format!("unknown resolution: {s}")))
    }
}
