//! The recursive read-through algorithm.
//!
//! `load_or_fetch` serves one resolution from the cache and hands every gap to
//! `accumulate`, which in turn loads the resolution below and folds it into
//! grid-aligned periods. The finest level has no lower resolution and is
//! filled from the repository's remote `fetch`.

#[cfg(feature = "tracing")]
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use strata_core::{Accumulation, Ranged, Resolution, ResolutionRepository, StrataError, interval_order};

use crate::ResolutionLoader;

type Records<Repo> = Vec<<Repo as ResolutionRepository>::Record>;

impl<Repo: ResolutionRepository> ResolutionLoader<Repo> {
    /// Load records at `resolution` covering `[start, end)` in ascending order.
    ///
    /// Unless disabled on the builder, `end` is first truncated at the current
    /// time. Whole periods come from the cache where present; missing periods
    /// are computed from finer data and written back. Leading and trailing
    /// pieces that do not fill a whole period are labeled with `resolution`
    /// but computed from finer data and never cached.
    ///
    /// # Errors
    /// Returns the first failure from the repository: a remote fetch, a cache
    /// read, or a synchronously reported batch write.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "strata::load",
            skip(self, resolution, start, end),
            fields(resolution = %resolution, start = %start, end = %end),
        )
    )]
    pub async fn load(
        &self,
        resolution: Repo::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Records<Repo>, StrataError> {
        let end = if self.clamp_to_now {
            end.min(Utc::now())
        } else {
            end
        };
        if start >= end {
            return Ok(Vec::new());
        }

        #[cfg(feature = "tracing")]
        let began = Instant::now();
        #[cfg(feature = "tracing")]
        tracing::debug!(%end, "load begin");

        let records = self.load_or_fetch(Some(resolution), start, end).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            records = records.len(),
            elapsed_ms = began.elapsed().as_millis(),
            "load complete"
        );
        Ok(records)
    }

    /// Serve `[start, end)` at `resolution`, or straight from the remote
    /// source when there is no resolution left to descend to.
    pub(crate) fn load_or_fetch(
        &self,
        resolution: Option<Repo::Resolution>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Result<Records<Repo>, StrataError>> {
        Box::pin(async move {
            let Some(resolution) = resolution else {
                return self.repo.fetch(start, end).await;
            };
            let has_lower = resolution.lower().is_some();
            let aligned_start = resolution.round_up(start);
            let aligned_end = resolution.round_down(end);

            // No boundary inside the range: one partial period, or nothing at the finest level.
            if aligned_start > aligned_end {
                return if has_lower {
                    self.accumulate(resolution, start, end).await
                } else {
                    Ok(Vec::new())
                };
            }

            let mut out = Vec::new();
            if has_lower && aligned_start > start {
                out.extend(self.accumulate(resolution, start, aligned_start).await?);
            }
            if aligned_start < aligned_end {
                out.extend(self.load_body(resolution, aligned_start, aligned_end).await?);
            }
            if has_lower && end > aligned_end {
                out.extend(self.accumulate(resolution, aligned_end, end).await?);
            }
            Ok(out)
        })
    }

    /// Read the aligned body from the cache, compute the gaps and persist them.
    async fn load_body(
        &self,
        resolution: Repo::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Records<Repo>, StrataError> {
        let mut body = self.repo.get(resolution, start, end).await?;

        let mut filled = Vec::new();
        let mut cursor = start;
        for record in &body {
            if record.start() > cursor {
                filled.extend(self.fill_gap(resolution, cursor, record.start()).await?);
            }
            cursor = cursor.max(record.end());
        }
        if cursor < end {
            filled.extend(self.fill_gap(resolution, cursor, end).await?);
        }

        if !filled.is_empty() {
            let saved = match self.batch_size {
                Some(cap) => self.repo.save_capped(filled, cap).await?,
                None => self.repo.save(filled).await?,
            };
            body.extend(saved);
            body.sort_by(interval_order);
        }
        Ok(body)
    }

    async fn fill_gap(
        &self,
        resolution: Repo::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Records<Repo>, StrataError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(%resolution, %start, %end, "filling cache gap");
        self.accumulate(resolution, start, end).await
    }

    /// Build records at `resolution` for `[start, end)` from the resolution below.
    ///
    /// Periods follow the resolution's grid from `round_down(start)`, each
    /// clipped to the requested range. A finer item belongs to a period when
    /// the two half-open intervals overlap; an item starting on a period
    /// boundary belongs to the later period.
    async fn accumulate(
        &self,
        resolution: Repo::Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Records<Repo>, StrataError> {
        let finer = self.load_or_fetch(resolution.lower(), start, end).await?;

        let mut out = Vec::new();
        let mut cursor = 0;
        let mut period = resolution.round_down(start);
        while period < end {
            let next = resolution.next(period);
            if next <= period {
                break;
            }
            let from = period.max(start);
            let to = next.min(end);

            let mut acc = self.repo.new_accumulation(resolution, from, to);
            while let Some(item) = finer.get(cursor) {
                if item.end() <= from {
                    cursor += 1;
                    continue;
                }
                if item.start() >= to {
                    break;
                }
                acc.add(item);
                cursor += 1;
            }
            out.push(acc.complete());
            period = next;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            %resolution,
            finer = finer.len(),
            produced = out.len(),
            "accumulated"
        );
        Ok(out)
    }
}
