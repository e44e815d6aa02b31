use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use strata_core::{Ranged, Resolution, StrataError};
use strata_types::FanOutConfig;

use crate::{LineSource, Warehouse, WarehouseReader};

/// Builder for [`Warehouse`].
pub struct WarehouseBuilder<Res, L, P> {
    source: Arc<L>,
    reader: Arc<P>,
    config: FanOutConfig,
    _resolution: PhantomData<fn() -> Res>,
}

impl<Res, L, P> WarehouseBuilder<Res, L, P>
where
    Res: Resolution,
    L: LineSource<Res>,
    P: WarehouseReader<Res>,
    P::Record: Ranged,
{
    /// Builder over shared source and parser, starting from default fan-out settings.
    pub fn new(source: Arc<L>, reader: Arc<P>) -> Self {
        Self {
            source,
            reader,
            config: FanOutConfig::default(),
            _resolution: PhantomData,
        }
    }

    /// Replace the fan-out settings wholesale.
    #[must_use]
    pub fn config(mut self, config: FanOutConfig) -> Self {
        self.config = config;
        self
    }

    /// Duration each sub-request covers.
    #[must_use]
    pub fn request_span(mut self, span: Duration) -> Self {
        self.config.request_span = span;
        self
    }

    /// Maximum sub-requests in flight.
    #[must_use]
    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.config.max_concurrency = n;
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a zero span or zero concurrency.
    pub fn build(self) -> Result<Warehouse<Res, L, P>, StrataError> {
        self.config.validate()?;
        Ok(Warehouse {
            source: self.source,
            reader: self.reader,
            config: self.config,
            _resolution: PhantomData,
        })
    }
}
