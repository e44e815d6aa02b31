//! Time-bucket units and their rounding arithmetic.
//!
//! Two families are provided:
//! - [`DefaultResolution`]: fixed-length buckets (minute, hour, day, Monday-aligned week)
//!   computed with integer arithmetic on seconds since the epoch.
//! - [`CalendarResolution`]: UTC calendar buckets (day, month, year) using
//!   calendar-aware addition.
//!
//! Each family is a closed enum whose `lower` relation is a fixed lookup, so a
//! resolution chain runs from the coarsest variant down to the finest.

use core::fmt::{Debug, Display};
use core::hash::Hash;

use chrono::{DateTime, Utc};

mod calendar;
mod fixed;

pub use calendar::CalendarResolution;
pub use fixed::DefaultResolution;

/// Capability set shared by every resolution family.
pub trait Resolution: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {
    /// Stable upper-case name, e.g. `"HOUR"`.
    fn name(&self) -> &'static str;

    /// The immediately finer resolution, or `None` for the finest.
    fn lower(&self) -> Option<Self>;

    /// Start of the bucket containing `t`.
    ///
    /// Always `<= t`.
    fn round_down(&self, t: DateTime<Utc>) -> DateTime<Utc>;

    /// Start of the bucket immediately following the bucket containing `t`.
    ///
    /// Always `> t` unless the result saturates at the representable maximum.
    fn next(&self, t: DateTime<Utc>) -> DateTime<Utc>;

    /// `t` itself when it sits on a bucket boundary, otherwise the next boundary.
    fn round_up(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        if self.is_boundary(t) { t } else { self.next(t) }
    }

    /// True when `t` is the first instant of a bucket.
    fn is_boundary(&self, t: DateTime<Utc>) -> bool {
        self.round_down(t) == t
    }

    /// Every variant, finest first.
    fn all() -> &'static [Self];

    /// The finest variant (the one without a lower resolution).
    fn finest() -> Self;

    /// The coarsest variant.
    fn coarsest() -> Self;
}

/// Iterate from `resolution` down the chain to the finest resolution, inclusive.
pub fn descend<R: Resolution>(resolution: R) -> impl Iterator<Item = R> {
    core::iter::successors(Some(resolution), R::lower)
}
