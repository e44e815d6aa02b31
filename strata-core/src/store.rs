use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::StrataError;
use crate::record::Record;
use crate::resolution::Resolution;

/// A concrete local store holding records at every resolution.
///
/// `save_batch` has insert-or-ignore semantics and must be safe to call
/// concurrently from several batches.
#[async_trait]
pub trait LocalStore: Send + Sync + 'static {
    /// Resolution family of the stored records.
    type Resolution: Resolution;
    /// Stored record type.
    type Record: Record<Resolution = Self::Resolution>;

    /// Records at `resolution` overlapping `[start, end)`, ascending.
    async fn get(
        &self,
        resolution: Self::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Self::Record>, StrataError>;

    /// Insert a batch, ignoring records already present.
    async fn save_batch(&self, batch: &[Self::Record]) -> Result<(), StrataError>;

    /// Batch writes accepted but not yet finished.
    fn pending_batches(&self) -> usize {
        0
    }
}

#[async_trait]
impl<S: LocalStore> LocalStore for Arc<S> {
    type Resolution = S::Resolution;
    type Record = S::Record;

    async fn get(
        &self,
        resolution: Self::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Self::Record>, StrataError> {
        (**self).get(resolution, start, end).await
    }

    async fn save_batch(&self, batch: &[Self::Record]) -> Result<(), StrataError> {
        (**self).save_batch(batch).await
    }

    fn pending_batches(&self) -> usize {
        (**self).pending_batches()
    }
}
