//! Asynchronous batch persistence over any [`LocalStore`].
//!
//! Every `save_batch` call is handed to its own Tokio task so the read path
//! never waits on the store. The number of unfinished batch tasks is tracked
//! and exposed for callers that need to observe drain completion.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use strata_core::{BatchWriteError, LocalStore, StrataError};
use strata_types::PersistenceConfig;
use tokio::sync::{Notify, Semaphore, mpsc};

type FailureSender<R> = mpsc::UnboundedSender<BatchWriteError<R>>;

/// Receiving end for batches whose background write failed.
pub type FailureReceiver<R> = mpsc::UnboundedReceiver<BatchWriteError<R>>;

#[derive(Default)]
struct Tracker {
    pending: AtomicUsize,
    failed: AtomicUsize,
    idle: Notify,
}

// Decrements the pending count when the batch task ends, including on panic.
struct PendingGuard(Arc<Tracker>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.0.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Decorator that offloads every batch write onto a background task.
///
/// Reads pass straight through to the wrapped store. Failed writes are logged,
/// counted, and delivered as [`BatchWriteError`]s to the receiver returned by
/// [`take_failures`](Self::take_failures) once one has been taken.
pub struct ConcurrentStore<S: LocalStore> {
    inner: Arc<S>,
    tracker: Arc<Tracker>,
    permits: Option<Arc<Semaphore>>,
    failures: Arc<Mutex<Option<FailureSender<S::Record>>>>,
}

impl<S: LocalStore> ConcurrentStore<S> {
    /// Wrap `inner` with one unbounded task per batch.
    pub fn new(inner: S) -> Self {
        Self::from_arc(Arc::new(inner), None)
    }

    /// Wrap `inner` using the persistence settings (`max_in_flight` bounds concurrent writes).
    ///
    /// # Errors
    /// Returns `InvalidArg` if the configuration does not validate.
    pub fn with_config(inner: S, config: &PersistenceConfig) -> Result<Self, StrataError> {
        config.validate()?;
        Ok(Self::from_arc(Arc::new(inner), config.max_in_flight))
    }

    /// Wrap a shared store, optionally bounding concurrently running writes.
    pub fn from_arc(inner: Arc<S>, max_in_flight: Option<usize>) -> Self {
        Self {
            inner,
            tracker: Arc::new(Tracker::default()),
            permits: max_in_flight.map(|n| Arc::new(Semaphore::new(n.max(1)))),
            failures: Arc::new(Mutex::new(None)),
        }
    }

    /// Access the wrapped store.
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    /// Batch tasks submitted but not yet finished.
    pub fn pending_batches(&self) -> usize {
        self.tracker.pending.load(Ordering::Acquire)
    }

    /// True when no batch task is in flight.
    pub fn is_idle(&self) -> bool {
        self.pending_batches() == 0
    }

    /// Total batch writes that have failed since construction.
    pub fn failed_batches(&self) -> usize {
        self.tracker.failed.load(Ordering::Acquire)
    }

    /// Take the receiver for failed batches.
    ///
    /// Returns `None` after the first call. Failures that occur before the
    /// receiver is taken are logged and counted only.
    pub fn take_failures(&self) -> Option<FailureReceiver<S::Record>> {
        let mut slot = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *slot = Some(tx);
        Some(rx)
    }

    /// Resolve once no batch task is in flight.
    pub async fn drained(&self) {
        loop {
            let mut notified = std::pin::pin!(self.tracker.idle.notified());
            notified.as_mut().enable();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }

    /// Wait for pending batches to finish, up to `timeout`.
    ///
    /// # Errors
    /// Returns `DrainTimeout` carrying the number of batches still pending when
    /// the deadline elapsed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "strata::middleware::drain",
            skip(self),
            fields(pending = self.pending_batches()),
        )
    )]
    pub async fn drain(&self, timeout: Duration) -> Result<(), StrataError> {
        tokio::time::timeout(timeout, self.drained())
            .await
            .map_err(|_| StrataError::DrainTimeout {
                pending: self.pending_batches(),
            })
    }
}

#[async_trait]
impl<S: LocalStore> LocalStore for ConcurrentStore<S> {
    type Resolution = S::Resolution;
    type Record = S::Record;

    async fn get(
        &self,
        resolution: Self::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Self::Record>, StrataError> {
        self.inner.get(resolution, start, end).await
    }

    /// Copy the batch into a background task and return immediately.
    async fn save_batch(&self, batch: &[Self::Record]) -> Result<(), StrataError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.tracker.pending.fetch_add(1, Ordering::AcqRel);
        let tracker = Arc::clone(&self.tracker);
        let guard = PendingGuard(Arc::clone(&tracker));
        let inner = Arc::clone(&self.inner);
        let permits = self.permits.clone();
        let failures = Arc::clone(&self.failures);
        let batch = batch.to_vec();

        tokio::spawn(async move {
            let _guard = guard;
            let _permit = match permits {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };
            match inner.save_batch(&batch).await {
                Ok(()) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(size = batch.len(), "batch saved");
                }
                Err(source) => {
                    tracker.failed.fetch_add(1, Ordering::AcqRel);
                    #[cfg(feature = "tracing")]
                    tracing::warn!(size = batch.len(), error = %source, "batch write failed");
                    let tx = failures
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .clone();
                    if let Some(tx) = tx {
                        let _ = tx.send(BatchWriteError::new(batch, source));
                    }
                }
            }
        });
        Ok(())
    }

    fn pending_batches(&self) -> usize {
        self.tracker.pending.load(Ordering::Acquire)
    }
}
