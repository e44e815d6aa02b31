use chrono::{DateTime, Utc};

use crate::interval::Ranged;

/// One independently fetched slice of a larger series.
///
/// The contained data is already ascending and non-overlapping; the part
/// caches the start of its first item so parts can be ordered without
/// inspecting their contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePart<R> {
    leading: Option<DateTime<Utc>>,
    data: Vec<R>,
}

impl<R: Ranged> ResponsePart<R> {
    /// Wrap sorted data.
    pub fn new(data: Vec<R>) -> Self {
        let leading = data.first().map(Ranged::start);
        Self { leading, data }
    }

    /// Start of the first item, or `None` when the part is empty.
    pub const fn leading(&self) -> Option<DateTime<Utc>> {
        self.leading
    }

    /// Number of items in the part.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the part carries no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the part and return its items.
    pub fn into_data(self) -> Vec<R> {
        self.data
    }
}

/// Merge parts into one ascending series.
///
/// Only the parts are sorted (by leading start); their contents are
/// concatenated as-is. Empty parts are skipped.
pub fn merge_parts<R, I>(parts: I) -> Vec<R>
where
    R: Ranged,
    I: IntoIterator<Item = ResponsePart<R>>,
{
    let mut parts: Vec<ResponsePart<R>> = parts.into_iter().filter(|p| !p.is_empty()).collect();
    parts.sort_by_key(ResponsePart::leading);

    let total = parts.iter().map(ResponsePart::len).sum();
    let mut out = Vec::with_capacity(total);
    for part in parts {
        out.extend(part.data);
    }
    debug_assert!(is_ascending(&out), "merged parts overlap");
    out
}

/// True when every adjacent pair starts strictly in order.
pub fn is_ascending<R: Ranged>(items: &[R]) -> bool {
    items.windows(2).all(|w| w[0].start() < w[1].start())
}

/// True when items are ascending and no item starts before its predecessor ends.
pub fn is_non_overlapping<R: Ranged>(items: &[R]) -> bool {
    items
        .windows(2)
        .all(|w| w[0].start() < w[1].start() && w[0].end() <= w[1].start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    fn iv(a: i64, b: i64) -> Interval {
        Interval::new(
            DateTime::from_timestamp(a, 0).unwrap(),
            DateTime::from_timestamp(b, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn orders_parts_by_leading_start() {
        let late = ResponsePart::new(vec![iv(120, 180), iv(180, 240)]);
        let early = ResponsePart::new(vec![iv(0, 60), iv(60, 120)]);
        let merged = merge_parts(vec![late, early]);
        assert_eq!(merged, vec![iv(0, 60), iv(60, 120), iv(120, 180), iv(180, 240)]);
        assert!(is_non_overlapping(&merged));
    }

    #[test]
    fn empty_parts_are_skipped() {
        let empty = ResponsePart::<Interval>::new(vec![]);
        assert_eq!(empty.leading(), None);
        let merged = merge_parts(vec![empty, ResponsePart::new(vec![iv(0, 60)])]);
        assert_eq!(merged, vec![iv(0, 60)]);
        assert!(merge_parts(Vec::<ResponsePart<Interval>>::new()).is_empty());
    }

    #[test]
    fn detects_disorder_and_overlap() {
        assert!(!is_ascending(&[iv(60, 120), iv(0, 60)]));
        assert!(is_ascending(&[iv(0, 90), iv(60, 120)]));
        assert!(!is_non_overlapping(&[iv(0, 90), iv(60, 120)]));
    }
}
