use async_trait::async_trait;
use strata_core::{Resolution, StrataError};

use crate::WarehouseRequest;

/// Transport abstraction for the remote warehouse (so tests can inject fakes).
///
/// Returns the raw response lines for one request. The line format belongs to
/// the paired [`WarehouseReader`].
#[async_trait]
pub trait LineSource<Res: Resolution>: Send + Sync + 'static {
    /// Fetch every raw line covering `request`.
    async fn lines(&self, request: &WarehouseRequest<Res>) -> Result<Vec<String>, StrataError>;
}

/// Parser turning one raw warehouse line into one finest-resolution record.
pub trait WarehouseReader<Res: Resolution>: Send + Sync + 'static {
    /// Record type produced for each line.
    type Record: Send + 'static;

    /// Parse `line`, the `index`-th line of the response to `request`.
    ///
    /// # Errors
    /// Returns `Data` when the line cannot be interpreted.
    fn read_line(
        &self,
        request: &WarehouseRequest<Res>,
        line: &str,
        index: usize,
    ) -> Result<Self::Record, StrataError>;
}
