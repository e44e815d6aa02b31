// Shared fixtures so tests can `use helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use strata::{ConcurrentStore, DefaultResolution, Resolution, ResolutionLoader, Warehouse};
use strata_mock::{MemoryStore, SyntheticSource, UsageReader, UsageRecord, UsageRepository};

pub type Usage<Res = DefaultResolution> = UsageRecord<Res>;
pub type Cached<Res = DefaultResolution> = ConcurrentStore<MemoryStore<UsageRecord<Res>>>;
pub type Repo<Res = DefaultResolution, S = Cached<Res>> = UsageRepository<Res, S, SyntheticSource>;
pub type Loader<Res = DefaultResolution, S = Cached<Res>> = ResolutionLoader<Repo<Res, S>>;

pub const TWO_HOURS: Duration = Duration::from_secs(2 * 60 * 60);
pub const THIRTY_DAYS: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Route `RUST_LOG`-filtered spans and events to the test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn t(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub fn warehouse<Res: Resolution>(
    source: SyntheticSource,
    span: Duration,
) -> Warehouse<Res, SyntheticSource, UsageReader<Res>> {
    Warehouse::builder(source, UsageReader::new())
        .request_span(span)
        .build()
        .expect("warehouse config")
}

/// Loader over a write-behind memory store, with clamping disabled so fixed
/// historical ranges load in full.
pub fn loader_over<Res: Resolution>(
    source: SyntheticSource,
    memory: MemoryStore<UsageRecord<Res>>,
    span: Duration,
) -> Loader<Res> {
    let repo = UsageRepository::new(ConcurrentStore::new(memory), warehouse(source, span));
    ResolutionLoader::builder(repo)
        .clamp_to_now(false)
        .build()
        .expect("loader config")
}

pub fn loader() -> Loader {
    loader_over(SyntheticSource::new(), MemoryStore::new(), TWO_HOURS)
}

/// Loader whose store writes on the calling path.
pub fn plain_loader(memory: MemoryStore<Usage>) -> Loader<DefaultResolution, MemoryStore<Usage>> {
    let repo = UsageRepository::new(memory, warehouse(SyntheticSource::new(), TWO_HOURS));
    ResolutionLoader::builder(repo)
        .clamp_to_now(false)
        .build()
        .expect("loader config")
}

pub fn memory<Res: Resolution>(loader: &Loader<Res>) -> &Arc<MemoryStore<UsageRecord<Res>>> {
    loader.repository().store().inner()
}

pub fn source<Res: Resolution, S>(loader: &Loader<Res, S>) -> &Arc<SyntheticSource>
where
    S: strata::LocalStore<Resolution = Res, Record = UsageRecord<Res>>,
{
    loader.repository().warehouse().source()
}

/// Wait for every background batch write to finish.
pub async fn settle<Res: Resolution>(loader: &Loader<Res>) {
    loader
        .repository()
        .store()
        .drain(Duration::from_secs(30))
        .await
        .expect("pending batches drained");
}

/// Assert records tile `[start, end)` with no gap or overlap.
pub fn assert_tiles<Res: Resolution>(records: &[Usage<Res>], start: DateTime<Utc>, end: DateTime<Utc>) {
    assert!(!records.is_empty(), "no records for [{start}, {end})");
    assert_eq!(records[0].start, start);
    assert_eq!(records[records.len() - 1].end, end);
    for pair in records.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "gap or overlap at {}", pair[0].end);
    }
}
