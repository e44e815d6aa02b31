use core::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strata_core::Resolution;

/// A request for raw data from the warehouse.
///
/// Identifies the series, the resolution the data is requested at, and the
/// half-open range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WarehouseRequest<Res> {
    series: String,
    resolution: Res,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl<Res: Resolution> WarehouseRequest<Res> {
    /// Build a request. An inverted or empty range is allowed and divides into nothing.
    pub fn new(
        series: impl Into<String>,
        resolution: Res,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            series: series.into(),
            resolution,
            start,
            end,
        }
    }

    /// Series identifier.
    pub fn series(&self) -> &str {
        &self.series
    }

    /// Requested resolution.
    pub fn resolution(&self) -> Res {
        self.resolution
    }

    /// Inclusive start.
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end.
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// True when the range holds no instants.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Split into consecutive sub-requests of at most `span` each.
    ///
    /// Series and resolution are preserved; the last piece is truncated at
    /// `end`. A zero or unrepresentable span yields the request unsplit.
    pub fn divide(&self, span: Duration) -> Vec<Self> {
        if self.is_empty() {
            return Vec::new();
        }
        let step = match TimeDelta::from_std(span) {
            Ok(step) if step > TimeDelta::zero() => step,
            _ => return vec![self.clone()],
        };

        let mut pieces = Vec::new();
        let mut cursor = self.start;
        while cursor < self.end {
            let next = cursor
                .checked_add_signed(step)
                .map_or(self.end, |n| n.min(self.end));
            pieces.push(Self {
                series: self.series.clone(),
                resolution: self.resolution,
                start: cursor,
                end: next,
            });
            cursor = next;
        }
        pieces
    }
}

impl<Res: fmt::Display> fmt::Display for WarehouseRequest<Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}[{}, {})",
            self.series,
            self.resolution,
            self.start.to_rfc3339(),
            self.end.to_rfc3339()
        )
    }
}
