use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::StrataError;
use crate::accumulation::Accumulation;
use crate::batch::batch_ranges;
use crate::record::Record;
use crate::resolution::Resolution;

pub use strata_types::DEFAULT_BATCH_SIZE;

/// The only data-access surface the resolution loader depends on.
///
/// Implementations must return `get` and `fetch` results in ascending interval
/// order without overlaps. The loader does not check this.
#[async_trait]
pub trait ResolutionRepository: Send + Sync {
    /// Resolution family served by this repository.
    type Resolution: Resolution;
    /// Record type stored and produced at every resolution.
    type Record: Record<Resolution = Self::Resolution>;
    /// Aggregator used to build coarser records from finer ones.
    type Accumulation: Accumulation<Self::Record>;

    /// Retrieve finest-resolution data for `[start, end)` from the remote source.
    async fn fetch(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Self::Record>, StrataError>;

    /// Read cached records at `resolution` overlapping `[start, end)`, in ascending order.
    async fn get(
        &self,
        resolution: Self::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Self::Record>, StrataError>;

    /// Insert one batch of records, ignoring any that are already present.
    ///
    /// Implementations may complete the write asynchronously and need not use
    /// a transaction.
    async fn save_batch(&self, batch: &[Self::Record]) -> Result<(), StrataError>;

    /// Open an aggregator for exactly one output period `[start, end)` at `resolution`.
    fn new_accumulation(
        &self,
        resolution: Self::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self::Accumulation;

    /// Upper bound on records per `save_batch` call made by [`save`](Self::save).
    fn batch_size(&self) -> usize {
        DEFAULT_BATCH_SIZE
    }

    /// Batches handed to `save_batch` whose writes have not finished yet.
    fn pending_batches(&self) -> usize {
        0
    }

    /// Persist `records` in near-equal batches of at most [`batch_size`](Self::batch_size).
    ///
    /// # Errors
    /// Returns the first error reported by `save_batch`; later batches are not attempted.
    async fn save(&self, records: Vec<Self::Record>) -> Result<Vec<Self::Record>, StrataError> {
        let batch_size = self.batch_size();
        self.save_capped(records, batch_size).await
    }

    /// Persist `records` in near-equal batches of at most `batch_size` and return them unchanged.
    ///
    /// # Errors
    /// Returns the first error reported by `save_batch`; later batches are not attempted.
    async fn save_capped(
        &self,
        records: Vec<Self::Record>,
        batch_size: usize,
    ) -> Result<Vec<Self::Record>, StrataError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(records = records.len(), batch_size, "saving records in batches");
        for range in batch_ranges(records.len(), batch_size) {
            self.save_batch(&records[range]).await?;
        }
        Ok(records)
    }
}
