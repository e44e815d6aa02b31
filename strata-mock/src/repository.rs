use async_trait::async_trait;
use chrono::{DateTime, Utc};
use strata_core::{DEFAULT_BATCH_SIZE, LocalStore, ResolutionRepository, Resolution, StrataError};
use strata_types::PersistenceConfig;
use strata_warehouse::{LineSource, Warehouse, WarehouseRequest};

use crate::{UsageAccumulation, UsageReader, UsageRecord};

/// Usage repository: a local store for every resolution plus the warehouse for raw data.
pub struct UsageRepository<Res, S, L> {
    store: S,
    warehouse: Warehouse<Res, L, UsageReader<Res>>,
    series: String,
    batch_size: usize,
}

impl<Res, S, L> UsageRepository<Res, S, L>
where
    Res: Resolution,
    S: LocalStore<Resolution = Res, Record = UsageRecord<Res>>,
    L: LineSource<Res>,
{
    /// Wire a store and a warehouse client for the `"usage"` series.
    pub fn new(store: S, warehouse: Warehouse<Res, L, UsageReader<Res>>) -> Self {
        Self {
            store,
            warehouse,
            series: "usage".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Use a different warehouse series.
    #[must_use]
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = series.into();
        self
    }

    /// Cap each persisted batch at `batch_size` records.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Apply the persistence settings (`batch_size` caps each persisted batch).
    #[must_use]
    pub fn with_config(self, config: &PersistenceConfig) -> Self {
        self.with_batch_size(config.batch_size)
    }

    /// The local store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The warehouse client.
    pub const fn warehouse(&self) -> &Warehouse<Res, L, UsageReader<Res>> {
        &self.warehouse
    }
}

#[async_trait]
impl<Res, S, L> ResolutionRepository for UsageRepository<Res, S, L>
where
    Res: Resolution,
    S: LocalStore<Resolution = Res, Record = UsageRecord<Res>>,
    L: LineSource<Res>,
{
    type Resolution = Res;
    type Record = UsageRecord<Res>;
    type Accumulation = UsageAccumulation<Res>;

    async fn fetch(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord<Res>>, StrataError> {
        let request = WarehouseRequest::new(self.series.clone(), Res::finest(), start, end);
        self.warehouse.get(&request).await
    }

    async fn get(
        &self,
        resolution: Res,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord<Res>>, StrataError> {
        self.store.get(resolution, start, end).await
    }

    async fn save_batch(&self, batch: &[UsageRecord<Res>]) -> Result<(), StrataError> {
        self.store.save_batch(batch).await
    }

    fn new_accumulation(
        &self,
        resolution: Res,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> UsageAccumulation<Res> {
        UsageAccumulation::new(resolution, start, end)
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn pending_batches(&self) -> usize {
        self.store.pending_batches()
    }
}
