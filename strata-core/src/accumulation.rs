/// A single-use aggregator folding finer records into one record for a period.
///
/// The loader calls [`add`](Accumulation::add) once per finer item overlapping
/// the period, in ascending order, then [`complete`](Accumulation::complete)
/// exactly once. The instance is consumed by `complete`.
pub trait Accumulation<R>: Send {
    /// Fold one finer-resolution item into the running totals.
    fn add(&mut self, item: &R);

    /// Finalize and return the record for the period this accumulation was opened for.
    fn complete(self) -> R;
}
