use core::fmt::Debug;

use crate::interval::Ranged;
use crate::resolution::Resolution;

/// A data unit held at some resolution: an interval plus domain aggregate fields.
///
/// Records are write-once. Two records computed independently for the same
/// resolution and interval from the same finer data must be value-equal, which
/// is what makes duplicate, non-transactional writes harmless.
pub trait Record: Ranged + Clone + Debug + Send + Sync + 'static {
    /// The resolution family this record is labeled with.
    type Resolution: Resolution;

    /// Resolution label of this record.
    fn resolution(&self) -> Self::Resolution;
}
