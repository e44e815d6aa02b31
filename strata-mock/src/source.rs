use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_core::{Resolution, StrataError};
use strata_warehouse::{LineSource, WarehouseRequest};

/// Deterministic stand-in for the remote warehouse.
///
/// Emits one `epoch,units,blocks` line per resolution step from
/// `resolution.round_up(start)` up to `end`. Each line is seeded from the
/// series, the resolution and its own instant, so a step carries the same
/// values however the surrounding range is split.
#[derive(Debug, Default)]
pub struct SyntheticSource {
    latency: Option<Duration>,
    failing: AtomicBool,
    calls: AtomicUsize,
    lines_served: AtomicUsize,
}

impl SyntheticSource {
    /// A source that answers immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate network latency on every request.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent request fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Lines returned so far.
    pub fn lines_served(&self) -> usize {
        self.lines_served.load(Ordering::SeqCst)
    }

    /// Generate the lines for `request` without counting or delaying.
    pub fn generate<Res: Resolution>(request: &WarehouseRequest<Res>) -> Vec<String> {
        let resolution = request.resolution();
        let mut lines = Vec::new();
        let mut cursor = resolution.round_up(request.start());
        while cursor < request.end() {
            let mut hasher = DefaultHasher::new();
            request.series().hash(&mut hasher);
            resolution.name().hash(&mut hasher);
            cursor.timestamp().hash(&mut hasher);
            let mut rng = StdRng::seed_from_u64(hasher.finish());

            let units: u64 = rng.random_range(100..300);
            let blocks: u64 = rng.random_range(0..100);
            lines.push(format!("{},{units},{blocks}", cursor.timestamp()));

            let next = resolution.next(cursor);
            if next <= cursor {
                break;
            }
            cursor = next;
        }
        lines
    }
}

#[async_trait]
impl<Res: Resolution> LineSource<Res> for SyntheticSource {
    async fn lines(&self, request: &WarehouseRequest<Res>) -> Result<Vec<String>, StrataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StrataError::warehouse(request.to_string(), "synthetic outage"));
        }
        let lines = Self::generate(request);
        self.lines_served.fetch_add(lines.len(), Ordering::SeqCst);
        Ok(lines)
    }
}
