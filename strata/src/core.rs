use std::sync::Arc;

use strata_core::{ResolutionRepository, StrataError};
use strata_types::StrataConfig;

/// Read-through loader that serves any resolution from the local cache,
/// filling gaps by aggregating the resolution below it.
pub struct ResolutionLoader<Repo> {
    pub(crate) repo: Arc<Repo>,
    pub(crate) clamp_to_now: bool,
    pub(crate) batch_size: Option<usize>,
}

impl<Repo: ResolutionRepository> ResolutionLoader<Repo> {
    /// Create a loader with default settings (end dates are clamped to now).
    pub fn new(repo: Repo) -> Self {
        Self {
            repo: Arc::new(repo),
            clamp_to_now: true,
            batch_size: None,
        }
    }

    /// Start building a loader over `repo`.
    pub fn builder(repo: Repo) -> LoaderBuilder<Repo> {
        LoaderBuilder::new(Arc::new(repo))
    }

    /// The repository every read and write goes through.
    pub fn repository(&self) -> &Arc<Repo> {
        &self.repo
    }

    /// Whether `load` truncates the requested end at the current time.
    pub const fn clamps_to_now(&self) -> bool {
        self.clamp_to_now
    }

    /// Batch cap applied when writing filled gaps, if it overrides the repository's own.
    pub const fn batch_size(&self) -> Option<usize> {
        self.batch_size
    }

    /// Batches written by earlier loads that have not finished persisting.
    pub fn pending_batches(&self) -> usize {
        self.repo.pending_batches()
    }
}

impl<Repo> Clone for ResolutionLoader<Repo> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clamp_to_now: self.clamp_to_now,
            batch_size: self.batch_size,
        }
    }
}

/// Builder for constructing a [`ResolutionLoader`].
pub struct LoaderBuilder<Repo> {
    repo: Arc<Repo>,
    cfg: StrataConfig,
    batch_size: Option<usize>,
}

impl<Repo: ResolutionRepository> LoaderBuilder<Repo> {
    /// Create a builder over a shared repository with default configuration.
    #[must_use]
    pub fn new(repo: Arc<Repo>) -> Self {
        Self {
            repo,
            cfg: StrataConfig::default(),
            batch_size: None,
        }
    }

    /// Replace the whole configuration.
    ///
    /// The loader reads `clamp_to_now` and caps every write of filled gaps at
    /// `persistence.batch_size`, overriding the repository's own
    /// [`batch_size`](ResolutionRepository::batch_size). The fan-out section
    /// is validated here and applied where the warehouse is built.
    #[must_use]
    pub fn config(mut self, cfg: StrataConfig) -> Self {
        self.batch_size = Some(cfg.persistence.batch_size);
        self.cfg = cfg;
        self
    }

    /// Cap each batch written for filled gaps at `batch_size` records.
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.cfg.persistence.batch_size = batch_size;
        self.batch_size = Some(batch_size);
        self
    }

    /// Toggle truncation of requested end dates at the current time.
    ///
    /// Leave this on in production; fixed historical ranges in tests are the
    /// reason to turn it off.
    #[must_use]
    pub fn clamp_to_now(mut self, yes: bool) -> Self {
        self.cfg.clamp_to_now = yes;
        self
    }

    /// Build the loader.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the configuration does not validate.
    pub fn build(self) -> Result<ResolutionLoader<Repo>, StrataError> {
        self.cfg.validate()?;
        Ok(ResolutionLoader {
            repo: self.repo,
            clamp_to_now: self.cfg.clamp_to_now,
            batch_size: self.batch_size,
        })
    }
}
