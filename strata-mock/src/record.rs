use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strata_core::{Accumulation, Ranged, Record, Resolution};

/// Usage counters for one interval at one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageRecord<Res> {
    /// Resolution label.
    pub resolution: Res,
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
    /// Requests served.
    pub units: u64,
    /// Requests blocked.
    pub blocks: u64,
}

impl<Res: Resolution> UsageRecord<Res> {
    /// An empty record covering `[start, end)` at `resolution`.
    pub const fn empty(resolution: Res, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            resolution,
            start,
            end,
            units: 0,
            blocks: 0,
        }
    }
}

impl<Res> Ranged for UsageRecord<Res> {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }

    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl<Res: Resolution> Record for UsageRecord<Res> {
    type Resolution = Res;

    fn resolution(&self) -> Res {
        self.resolution
    }
}

/// Sums `units` and `blocks` of the finer records added to it.
#[derive(Debug)]
pub struct UsageAccumulation<Res>(UsageRecord<Res>);

impl<Res: Resolution> UsageAccumulation<Res> {
    /// Open an accumulation for `[start, end)` at `resolution`.
    pub const fn new(resolution: Res, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self(UsageRecord::empty(resolution, start, end))
    }
}

impl<Res: Resolution> Accumulation<UsageRecord<Res>> for UsageAccumulation<Res> {
    fn add(&mut self, item: &UsageRecord<Res>) {
        self.0.units += item.units;
        self.0.blocks += item.blocks;
    }

    fn complete(self) -> UsageRecord<Res> {
        self.0
    }
}

/// Sum of `units` across `records`.
pub fn total_units<Res>(records: &[UsageRecord<Res>]) -> u64 {
    records.iter().map(|r| r.units).sum()
}

/// Sum of `blocks` across `records`.
pub fn total_blocks<Res>(records: &[UsageRecord<Res>]) -> u64 {
    records.iter().map(|r| r.blocks).sum()
}
