use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use strata_core::{LocalStore, Record, StrataError};

type Key = (DateTime<Utc>, DateTime<Utc>);
type Table<R> = HashMap<<R as Record>::Resolution, BTreeMap<Key, R>>;

/// In-process local store keyed by (resolution, start, end).
///
/// Inserts ignore records that are already present. Every read and write
/// takes the same lock.
pub struct MemoryStore<R: Record> {
    table: Mutex<Table<R>>,
    write_latency: Option<Duration>,
    fail_writes: AtomicBool,
    get_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
            write_latency: None,
            fail_writes: AtomicBool::new(false),
            get_calls: AtomicUsize::new(0),
            save_calls: AtomicUsize::new(0),
        }
    }
}

impl<R: Record> MemoryStore<R> {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `latency` after each batch is written.
    #[must_use]
    pub fn with_write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = Some(latency);
        self
    }

    /// Make subsequent `save_batch` calls fail without writing.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Table<R>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert records synchronously, ignoring duplicates. Returns how many were new.
    pub fn seed(&self, records: impl IntoIterator<Item = R>) -> usize {
        let mut table = self.lock();
        let mut inserted = 0;
        for record in records {
            let rows = table.entry(record.resolution()).or_default();
            if let std::collections::btree_map::Entry::Vacant(slot) =
                rows.entry((record.start(), record.end()))
            {
                slot.insert(record);
                inserted += 1;
            }
        }
        inserted
    }

    /// Every record held at `resolution`, ascending.
    pub fn records(&self, resolution: R::Resolution) -> Vec<R> {
        self.lock()
            .get(&resolution)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of records held at `resolution`.
    pub fn len(&self, resolution: R::Resolution) -> usize {
        self.lock().get(&resolution).map_or(0, BTreeMap::len)
    }

    /// True when nothing is stored at any resolution.
    pub fn is_empty(&self) -> bool {
        self.lock().values().all(BTreeMap::is_empty)
    }

    /// `get` calls served so far.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// `save_batch` calls received so far, including failed ones.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: Record> LocalStore for MemoryStore<R> {
    type Resolution = R::Resolution;
    type Record = R;

    async fn get(
        &self,
        resolution: R::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<R>, StrataError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let table = self.lock();
        let Some(rows) = table.get(&resolution) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .range(..(end, DateTime::<Utc>::MIN_UTC))
            .filter(|((_, row_end), _)| *row_end > start)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn save_batch(&self, batch: &[R]) -> Result<(), StrataError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StrataError::store("memory", "writes disabled"));
        }
        self.seed(batch.iter().cloned());
        if let Some(latency) = self.write_latency {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }
}
