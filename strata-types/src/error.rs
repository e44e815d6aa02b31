use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the strata workspace.
///
/// This covers argument validation, malformed warehouse data, local store and
/// warehouse failures, interrupted fan-out work, and batch persistence failures.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StrataError {
    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with the returned or expected data (unparseable lines, bad intervals, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// The local store failed to read or write.
    #[error("store {store} failed: {msg}")]
    Store {
        /// Store name that failed.
        store: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A warehouse sub-request failed.
    #[error("warehouse request {request} failed: {msg}")]
    Warehouse {
        /// Display form of the request that failed.
        request: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A fan-out task was cancelled before it produced a result.
    #[error("interrupted: {what}")]
    Interrupted {
        /// Description of the interrupted work.
        what: String,
    },

    /// A spawned task panicked.
    #[error("task failed: {0}")]
    TaskFailed(String),

    /// A batch of records could not be written to the local store.
    #[error("failed to write batch of {size} records: {msg}")]
    BatchWrite {
        /// Number of records in the failed batch.
        size: usize,
        /// Human-readable error message.
        msg: String,
    },

    /// Waiting for background batch writes exceeded the caller's deadline.
    #[error("timed out waiting for {pending} pending batches")]
    DrainTimeout {
        /// Batches still in flight when the deadline elapsed.
        pending: usize,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl StrataError {
    /// Helper: build a `Store` error with the store name and message.
    pub fn store(store: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Store {
            store: store.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Warehouse` error for a request description and message.
    pub fn warehouse(request: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Warehouse {
            request: request.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `Interrupted` error for a description of the cancelled work.
    pub fn interrupted(what: impl Into<String>) -> Self {
        Self::Interrupted { what: what.into() }
    }

    /// Helper: build a `BatchWrite` error.
    pub fn batch_write(size: usize, msg: impl Into<String>) -> Self {
        Self::BatchWrite {
            size,
            msg: msg.into(),
        }
    }

    /// Returns true if the error originated from the remote warehouse path.
    ///
    /// Cancelled and panicked fan-out tasks count as warehouse-side failures.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Warehouse { .. } | Self::Interrupted { .. } | Self::TaskFailed(_)
        )
    }
}
