use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::Resolution;
use crate::StrataError;

/// UTC calendar buckets: `DAY -> MONTH -> YEAR`.
///
/// Month and year arithmetic follows the calendar, so bucket lengths vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CalendarResolution {
    /// A calendar day.
    Day,
    /// A calendar month starting on the 1st.
    Month,
    /// A calendar year starting on January 1st.
    Year,
}

const ALL: [CalendarResolution; 3] = [
    CalendarResolution::Day,
    CalendarResolution::Month,
    CalendarResolution::Year,
];

const LOWER: [Option<CalendarResolution>; 3] = [
    None,
    Some(CalendarResolution::Day),
    Some(CalendarResolution::Month),
];

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl CalendarResolution {
    fn floor_date(self, t: DateTime<Utc>) -> NaiveDate {
        let date = t.date_naive();
        match self {
            Self::Day => date,
            Self::Month => date.with_day(1).unwrap_or(date),
            Self::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }
}

impl Resolution for CalendarResolution {
    fn name(&self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Month => "MONTH",
            Self::Year => "YEAR",
        }
    }

    fn lower(&self) -> Option<Self> {
        LOWER[*self as usize]
    }

    fn round_down(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        midnight(self.floor_date(t))
    }

    fn next(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let start = self.floor_date(t);
        let next = match self {
            Self::Day => start.checked_add_days(Days::new(1)),
            Self::Month => start.checked_add_months(Months::new(1)),
            Self::Year => start.checked_add_months(Months::new(12)),
        };
        next.map_or(DateTime::<Utc>::MAX_UTC, midnight)
    }

    fn all() -> &'static [Self] {
        &ALL
    }

    fn finest() -> Self {
        Self::Day
    }

    fn coarsest() -> Self {
        Self::Year
    }
}

impl fmt::Display for CalendarResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalendarResolution {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StrataError::InvalidArg(format!("unknown resolution: {s}")))
    }
}
