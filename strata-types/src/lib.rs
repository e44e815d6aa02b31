//! Strata-specific error and configuration primitives shared by every crate in the workspace.
#![warn(missing_docs)]

mod config;
mod error;

pub use config::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUEST_SPAN, FanOutConfig,
    PersistenceConfig, StrataConfig,
};
pub use error::StrataError;
