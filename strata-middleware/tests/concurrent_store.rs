use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use strata_core::{DefaultResolution, Interval, LocalStore, Ranged, Record, Resolution, StrataError};
use strata_middleware::ConcurrentStore;
use strata_mock::{MemoryStore, UsageRecord};
use strata_types::PersistenceConfig;
use tokio_test::{assert_pending, assert_ready, task};

type Rec = UsageRecord<DefaultResolution>;

fn minutes(from: usize, n: usize) -> Vec<Rec> {
    let base = DateTime::parse_from_rfc3339("2022-09-26T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    (from..from + n)
        .map(|i| {
            let start = base + TimeDelta::minutes(i64::try_from(i).unwrap());
            UsageRecord {
                resolution: DefaultResolution::Minute,
                start,
                end: DefaultResolution::Minute.next(start),
                units: 1,
                blocks: 0,
            }
        })
        .collect()
}

fn slow_store(latency_ms: u64) -> Arc<MemoryStore<Rec>> {
    Arc::new(MemoryStore::new().with_write_latency(Duration::from_millis(latency_ms)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn save_batch_returns_before_the_write_completes() {
    let inner = slow_store(200);
    let store = ConcurrentStore::from_arc(Arc::clone(&inner), None);

    store.save_batch(&minutes(0, 10)).await.unwrap();
    store.save_batch(&minutes(10, 10)).await.unwrap();
    assert_eq!(store.pending_batches(), 2);
    assert!(!store.is_idle());

    store.drain(Duration::from_secs(5)).await.unwrap();
    assert!(store.is_idle());
    assert_eq!(inner.len(DefaultResolution::Minute), 20);
    assert_eq!(store.failed_batches(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn drained_future_stays_pending_until_idle() {
    let store = ConcurrentStore::from_arc(slow_store(100), None);
    store.save_batch(&minutes(0, 5)).await.unwrap();

    let mut drained = task::spawn(store.drained());
    assert_pending!(drained.poll());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(drained.is_woken());
    assert_ready!(drained.poll());
}

#[tokio::test]
async fn drained_resolves_immediately_when_idle() {
    let store = ConcurrentStore::new(MemoryStore::<Rec>::new());
    let mut drained = task::spawn(store.drained());
    assert_ready!(drained.poll());
    store.drain(Duration::from_millis(1)).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn drain_times_out_with_pending_count() {
    let store = ConcurrentStore::from_arc(slow_store(2_000), None);
    store.save_batch(&minutes(0, 3)).await.unwrap();

    let err = store.drain(Duration::from_millis(20)).await.unwrap_err();
    assert_eq!(err, StrataError::DrainTimeout { pending: 1 });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_batches_are_counted_and_delivered_with_their_records() {
    let inner = Arc::new(MemoryStore::<Rec>::new());
    inner.set_fail_writes(true);
    let store = ConcurrentStore::from_arc(Arc::clone(&inner), None);
    let mut failures = store.take_failures().expect("first take");
    assert!(store.take_failures().is_none());

    let batch = minutes(0, 7);
    store.save_batch(&batch).await.unwrap();
    store.drain(Duration::from_secs(5)).await.unwrap();

    assert_eq!(store.failed_batches(), 1);
    let failed = failures.try_recv().unwrap();
    assert_eq!(failed.batch, batch);
    assert!(matches!(failed.source, StrataError::Store { .. }));
    assert_eq!(
        failed.into_error(),
        StrataError::batch_write(7, "store memory failed: writes disabled")
    );
    assert!(inner.is_empty());

    // sibling batches are unaffected once the store recovers
    inner.set_fail_writes(false);
    store.save_batch(&minutes(7, 3)).await.unwrap();
    store.drain(Duration::from_secs(5)).await.unwrap();
    assert_eq!(inner.len(DefaultResolution::Minute), 3);
    assert!(failures.try_recv().is_err());
}

/// Record that counts how often it is cloned.
#[derive(Debug)]
struct Counted {
    span: Interval,
    clones: Arc<AtomicUsize>,
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        self.clones.fetch_add(1, Ordering::SeqCst);
        Self {
            span: self.span,
            clones: Arc::clone(&self.clones),
        }
    }
}

impl Ranged for Counted {
    fn start(&self) -> DateTime<Utc> {
        self.span.start()
    }

    fn end(&self) -> DateTime<Utc> {
        self.span.end()
    }
}

impl Record for Counted {
    type Resolution = DefaultResolution;

    fn resolution(&self) -> DefaultResolution {
        DefaultResolution::Minute
    }
}

/// Store that rejects every write without touching the records.
struct Rejecting;

#[async_trait]
impl LocalStore for Rejecting {
    type Resolution = DefaultResolution;
    type Record = Counted;

    async fn get(
        &self,
        _: DefaultResolution,
        _: DateTime<Utc>,
        _: DateTime<Utc>,
    ) -> Result<Vec<Counted>, StrataError> {
        Ok(Vec::new())
    }

    async fn save_batch(&self, _: &[Counted]) -> Result<(), StrataError> {
        Err(StrataError::store("rejecting", "read only"))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn a_batch_is_copied_once_even_when_it_fails() {
    let clones = Arc::new(AtomicUsize::new(0));
    let batch: Vec<Counted> = minutes(0, 50)
        .iter()
        .map(|r| Counted {
            span: r.interval(),
            clones: Arc::clone(&clones),
        })
        .collect();
    let store = ConcurrentStore::new(Rejecting);
    let mut failures = store.take_failures().unwrap();

    store.save_batch(&batch).await.unwrap();
    store.drain(Duration::from_secs(5)).await.unwrap();

    let failed = failures.try_recv().unwrap();
    assert_eq!(failed.batch.len(), 50);
    assert_eq!(failed.batch[0].span, batch[0].span);
    assert_eq!(clones.load(Ordering::SeqCst), 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn max_in_flight_bounds_concurrent_writes() {
    let inner = slow_store(50);
    let config = PersistenceConfig {
        batch_size: 10,
        max_in_flight: Some(1),
    };
    let store = ConcurrentStore::with_config(Arc::clone(&inner), &config).unwrap();

    let started = std::time::Instant::now();
    for i in 0..4 {
        store.save_batch(&minutes(i * 10, 10)).await.unwrap();
    }
    assert_eq!(store.pending_batches(), 4);
    store.drain(Duration::from_secs(5)).await.unwrap();

    // one write at a time: four sequential 50ms sleeps
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(inner.len(DefaultResolution::Minute), 40);
}

#[tokio::test]
async fn empty_batches_are_not_submitted() {
    let store = ConcurrentStore::new(MemoryStore::<Rec>::new());
    store.save_batch(&[]).await.unwrap();
    assert!(store.is_idle());
    assert_eq!(store.inner().save_calls(), 0);
}

#[test]
fn invalid_config_is_rejected() {
    let config = PersistenceConfig {
        batch_size: 10,
        max_in_flight: Some(0),
    };
    let result = ConcurrentStore::with_config(MemoryStore::<Rec>::new(), &config);
    assert!(matches!(result, Err(StrataError::InvalidArg(_))));
}
