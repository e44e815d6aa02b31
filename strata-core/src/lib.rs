//! strata-core
//!
//! Core types, contracts, and time arithmetic shared across the strata workspace.
//!
//! - `interval`: the half-open [`Interval`] and the [`Ranged`] trait.
//! - `resolution`: the [`Resolution`] capability with fixed-length and calendar families.
//! - `accumulation`: the per-period [`Accumulation`] protocol.
//! - `repository`: the [`ResolutionRepository`] contract consumed by the loader.
//! - `store`: the [`LocalStore`] contract for concrete cache backends.
//! - `timeseries`: ordered merge of independently fetched parts.
//!
//! Async runtime
//! -------------
//! The contracts are `async-trait` traits and are runtime-agnostic; the
//! decorators and fan-out built on them in sibling crates assume Tokio 1.x.
#![warn(missing_docs)]

/// Per-period aggregation protocol.
pub mod accumulation;
/// Batch-splitting policy used by `ResolutionRepository::save`.
pub mod batch;
mod error;
/// Half-open intervals and the `Ranged` trait.
pub mod interval;
/// Interval-bearing records.
pub mod record;
/// Repository contract used by the resolution loader.
pub mod repository;
pub mod resolution;
/// Local store contract.
pub mod store;
pub mod timeseries;

pub use accumulation::Accumulation;
pub use batch::batch_ranges;
pub use error::{BatchWriteError, StrataError};
pub use interval::{Interval, Ranged, interval_order};
pub use record::Record;
pub use repository::{DEFAULT_BATCH_SIZE, ResolutionRepository};
pub use resolution::{CalendarResolution, DefaultResolution, Resolution, descend};
pub use store::LocalStore;
pub use timeseries::merge::{ResponsePart, is_ascending, is_non_overlapping, merge_parts};
