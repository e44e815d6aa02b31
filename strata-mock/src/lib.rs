//! Deterministic collaborators for tests and demos: a usage record with its
//! accumulation, a CSV line reader, a seeded synthetic warehouse, an in-memory
//! store, and a repository wiring them together.

mod reader;
mod record;
mod repository;
mod source;
mod store;

pub use reader::UsageReader;
pub use record::{UsageAccumulation, UsageRecord, total_blocks, total_units};
pub use repository::UsageRepository;
pub use source::SyntheticSource;
pub use store::MemoryStore;
