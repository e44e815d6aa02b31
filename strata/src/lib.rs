//! Strata serves time-series records at any resolution from a local cache,
//! filling what is missing by aggregating finer data and, at the bottom of the
//! chain, by fetching raw data from a slow remote warehouse.
//!
//! Overview
//! - A [`Resolution`] family forms a chain from coarse to fine (`WEEK → DAY →
//!   HOUR → MINUTE`, or `YEAR → MONTH → DAY`).
//! - [`ResolutionLoader::load`] reads whole periods from the cache, computes
//!   the gaps from the resolution below, writes them back, and returns the
//!   records in ascending order.
//! - Leading and trailing pieces that do not fill a whole period are computed
//!   on every call and never cached.
//! - The loader only talks to a [`ResolutionRepository`]. Concrete stores and
//!   warehouse clients plug in behind it.
//!
//! Key behaviors and trade-offs
//! - Persistence: wrap the store in [`ConcurrentStore`] to keep the read path
//!   from waiting on writes. A load right after another may miss the records
//!   still being written and recompute them; duplicate writes are ignored.
//! - Remote fetch: [`Warehouse`] divides a large request into fixed spans and
//!   fetches them on a bounded pool. The first failing piece cancels the rest.
//! - Clamping: `load` truncates the requested end at the current time unless
//!   disabled with [`LoaderBuilder::clamp_to_now`].
//!
//! Examples
//! Wiring a loader over an in-memory store and a warehouse:
//! ```rust,ignore
//! use std::time::Duration;
//! use strata::{ConcurrentStore, DefaultResolution, ResolutionLoader, Warehouse};
//! use strata_mock::{MemoryStore, SyntheticSource, UsageReader, UsageRepository};
//!
//! let warehouse = Warehouse::builder(SyntheticSource::new(), UsageReader::new())
//!     .request_span(Duration::from_secs(2 * 60 * 60))
//!     .max_concurrency(6)
//!     .build()?;
//! let store = ConcurrentStore::new(MemoryStore::new());
//! let loader = ResolutionLoader::builder(UsageRepository::new(store, warehouse)).build()?;
//!
//! let days = loader.load(DefaultResolution::Day, start, end).await?;
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod loader;

pub use core::{LoaderBuilder, ResolutionLoader};

pub use strata_middleware::{ConcurrentStore, FailureReceiver};
pub use strata_warehouse::{LineSource, Warehouse, WarehouseBuilder, WarehouseReader, WarehouseRequest};

// Re-export core types for convenience
pub use strata_core::{
    Accumulation,
    BatchWriteError,
    CalendarResolution,
    DefaultResolution,
    Interval,
    LocalStore,
    Ranged,
    Record,
    Resolution,
    ResolutionRepository,
    StrataError,
    descend,
    interval_order,
    is_ascending,
    is_non_overlapping,
};
pub use strata_types::{FanOutConfig, PersistenceConfig, StrataConfig};
