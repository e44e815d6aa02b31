//! strata-warehouse
//!
//! Fan-out retrieval of finest-resolution data from a slow remote warehouse.
//! A large request is divided into fixed-size pieces, the pieces are fetched
//! concurrently on a bounded pool of Tokio tasks, and the results are merged
//! back into ascending order by sorting the pieces (not the items).
#![warn(missing_docs)]

/// Transport and parser abstractions for the warehouse.
pub mod adapter;
mod builder;
mod request;

use std::marker::PhantomData;
use std::sync::Arc;

use strata_core::{Ranged, Resolution, ResponsePart, StrataError, merge_parts};
use strata_types::FanOutConfig;
use tokio::task::{JoinError, JoinSet};

pub use adapter::{LineSource, WarehouseReader};
pub use builder::WarehouseBuilder;
pub use request::WarehouseRequest;

/// Parallel, order-restoring client for a remote warehouse.
pub struct Warehouse<Res, L, P> {
    source: Arc<L>,
    reader: Arc<P>,
    config: FanOutConfig,
    _resolution: PhantomData<fn() -> Res>,
}

impl<Res, L, P> Warehouse<Res, L, P>
where
    Res: Resolution,
    L: LineSource<Res>,
    P: WarehouseReader<Res>,
    P::Record: Ranged,
{
    /// Start building a warehouse client over a line source and parser.
    pub fn builder(source: L, reader: P) -> WarehouseBuilder<Res, L, P> {
        WarehouseBuilder::new(Arc::new(source), Arc::new(reader))
    }

    /// Fan-out settings in effect.
    pub const fn config(&self) -> &FanOutConfig {
        &self.config
    }

    /// The underlying line source.
    pub fn source(&self) -> &Arc<L> {
        &self.source
    }

    /// Fetch every record covering `request`, in ascending order.
    ///
    /// The request is divided by `request_span`; at most `max_concurrency`
    /// pieces are in flight at once, and a piece is spawned only when a slot
    /// frees up. Pieces are collected as they complete.
    ///
    /// # Errors
    /// Returns the first failure reported by any piece. Remaining pieces are
    /// aborted. A cancelled piece maps to `Interrupted` and a panicked piece
    /// to `TaskFailed`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "strata::warehouse::get",
            skip(self, request),
            fields(request = %request),
        )
    )]
    pub async fn get(&self, request: &WarehouseRequest<Res>) -> Result<Vec<P::Record>, StrataError> {
        let pieces = request.divide(self.config.request_span);
        #[cfg(feature = "tracing")]
        let started = std::time::Instant::now();
        #[cfg(feature = "tracing")]
        tracing::debug!(pieces = pieces.len(), "dispatching warehouse requests");

        let limit = self.config.max_concurrency.max(1);
        let mut parts = Vec::with_capacity(pieces.len());
        let mut pending = pieces.into_iter();
        let mut tasks = JoinSet::new();
        loop {
            // Top up to the limit so unstarted pieces never hold a task.
            while tasks.len() < limit {
                let Some(piece) = pending.next() else { break };
                let source = Arc::clone(&self.source);
                let reader = Arc::clone(&self.reader);
                tasks.spawn(async move { fetch_part(source.as_ref(), reader.as_ref(), &piece).await });
            }
            let Some(joined) = tasks.join_next().await else { break };
            match joined {
                Ok(Ok(part)) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        records = part.len(),
                        running = tasks.len(),
                        remaining = pending.len(),
                        "warehouse piece completed"
                    );
                    parts.push(part);
                }
                Ok(Err(err)) => {
                    tasks.abort_all();
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %err, "warehouse piece failed");
                    return Err(err);
                }
                Err(join_err) => {
                    tasks.abort_all();
                    return Err(join_failure(&join_err));
                }
            }
        }

        let merged = merge_parts(parts);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            records = merged.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "warehouse request completed"
        );
        Ok(merged)
    }
}

async fn fetch_part<Res, L, P>(
    source: &L,
    reader: &P,
    piece: &WarehouseRequest<Res>,
) -> Result<ResponsePart<P::Record>, StrataError>
where
    Res: Resolution,
    L: LineSource<Res>,
    P: WarehouseReader<Res>,
    P::Record: Ranged,
{
    let lines = source.lines(piece).await?;
    let records = lines
        .iter()
        .enumerate()
        .map(|(index, line)| reader.read_line(piece, line, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResponsePart::new(records))
}

fn join_failure(err: &JoinError) -> StrataError {
    if err.is_cancelled() {
        StrataError::interrupted(format!("warehouse piece cancelled: {err}"))
    } else {
        StrataError::TaskFailed(format!("warehouse piece panicked: {err}"))
    }
}
