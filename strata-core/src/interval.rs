use core::cmp::Ordering;
use core::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::StrataError;

/// A half-open span of time `[start, end)`.
///
/// Ordering is by start, then by end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval.
    ///
    /// # Errors
    /// Returns `InvalidArg` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, StrataError> {
        if start >= end {
            return Err(StrataError::InvalidArg(format!(
                "interval start {start} must precede end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive start instant.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end instant.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the interval.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// True when `t` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// True when the two half-open intervals share at least one instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Anything that occupies a half-open span of time.
pub trait Ranged {
    /// Inclusive start instant.
    fn start(&self) -> DateTime<Utc>;

    /// Exclusive end instant.
    fn end(&self) -> DateTime<Utc>;

    /// The span as an [`Interval`].
    fn interval(&self) -> Interval {
        Interval {
            start: self.start(),
            end: self.end(),
        }
    }
}

impl Ranged for Interval {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }

    fn end(&self) -> DateTime<Utc> {
        self.end
    }

    fn interval(&self) -> Interval {
        *self
    }
}

/// Natural interval order: by start, then by end.
pub fn interval_order<R: Ranged>(a: &R, b: &R) -> Ordering {
    a.start().cmp(&b.start()).then_with(|| a.end().cmp(&b.end()))
}
