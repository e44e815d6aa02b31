//! Configuration types shared by the loader, the store decorator, and the warehouse.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::StrataError;

/// Default maximum number of records written per batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default duration each warehouse sub-request covers.
pub const DEFAULT_REQUEST_SPAN: Duration = Duration::from_secs(120 * 60);

/// Default number of warehouse sub-requests in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 6;

/// Persistence settings for newly accumulated records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Upper bound on the size of each batch handed to `save_batch`.
    ///
    /// Records are divided into batches of as equal size as possible, so with a
    /// cap of 60 a list of 61 records is written as 31 and 30. Smaller batches
    /// mean more write calls but make data visible to other readers sooner.
    pub batch_size: usize,
    /// Optional bound on concurrently running batch-write tasks.
    /// `None` spawns one task per batch without limit.
    pub max_in_flight: Option<usize>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_in_flight: None,
        }
    }
}

impl PersistenceConfig {
    /// Validate the settings.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `batch_size` or `max_in_flight` is zero.
    pub fn validate(&self) -> Result<(), StrataError> {
        if self.batch_size == 0 {
            return Err(StrataError::InvalidArg(
                "persistence.batch_size must be at least 1".into(),
            ));
        }
        if self.max_in_flight == Some(0) {
            return Err(StrataError::InvalidArg(
                "persistence.max_in_flight must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

/// Fan-out settings for warehouse fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
    /// Duration each sub-request covers; the last piece is truncated at the request end.
    pub request_span: Duration,
    /// Maximum number of sub-requests in flight against the warehouse.
    ///
    /// Should reflect how many concurrent requests the warehouse can serve
    /// and how many clients share it.
    pub max_concurrency: usize,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            request_span: DEFAULT_REQUEST_SPAN,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl FanOutConfig {
    /// Validate the settings.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `request_span` is zero or `max_concurrency` is zero.
    pub fn validate(&self) -> Result<(), StrataError> {
        if self.request_span.is_zero() {
            return Err(StrataError::InvalidArg(
                "fan_out.request_span must be non-zero".into(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(StrataError::InvalidArg(
                "fan_out.max_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Global configuration for a strata deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    /// Batch persistence settings.
    pub persistence: PersistenceConfig,
    /// Warehouse fan-out settings.
    pub fan_out: FanOutConfig,
    /// Clamp the end of every load to the current time.
    pub clamp_to_now: bool,
}

impl Default for StrataConfig {
    fn default() -> Self {
        Self {
            persistence: PersistenceConfig::default(),
            fan_out: FanOutConfig::default(),
            clamp_to_now: true,
        }
    }
}

impl StrataConfig {
    /// Validate every section.
    ///
    /// # Errors
    /// Returns the first `InvalidArg` reported by a section.
    pub fn validate(&self) -> Result<(), StrataError> {
        self.persistence.validate()?;
        self.fan_out.validate()
    }
}
