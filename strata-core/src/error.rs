use core::fmt;

use thiserror::Error;

pub use strata_types::StrataError;

/// A batch of records whose write to the local store failed.
///
/// Carries the offending batch so callers can retry or inspect it. Sibling
/// batches are unaffected.
#[derive(Debug, Clone, Error)]
#[error("failed to write batch of {} records: {source}", .batch.len())]
pub struct BatchWriteError<R: fmt::Debug> {
    /// Records that were not written.
    pub batch: Vec<R>,
    /// Underlying store failure.
    #[source]
    pub source: StrataError,
}

impl<R: fmt::Debug> BatchWriteError<R> {
    /// Wrap a failed batch and its cause.
    pub const fn new(batch: Vec<R>, source: StrataError) -> Self {
        Self { batch, source }
    }

    /// Collapse into a [`StrataError::BatchWrite`], dropping the records.
    #[must_use]
    pub fn into_error(self) -> StrataError {
        StrataError::batch_write(self.batch.len(), self.source.to_string())
    }
}
