//! Ordering and merge helpers for interval-bearing series.
//!
//! - `merge`: assemble independently fetched, internally sorted parts into one ascending series
/// Ordered merge of fan-out response parts.
pub mod merge;
