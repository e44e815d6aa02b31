//! Batch-splitting policy for persisting accumulated records.

use core::ops::Range;

/// Split `len` items into contiguous index ranges of at most `max` items each.
///
/// Every range is halved (larger half first) in rounds until all of them fit
/// the cap, so batch sizes differ by at most one: 61 items with a cap of 60
/// become `31 + 30`, 13 with a cap of 6 become `4 + 3 + 3 + 3`. A cap of zero
/// is treated as one. Empty input yields no ranges.
#[must_use]
pub fn batch_ranges(len: usize, max: usize) -> Vec<Range<usize>> {
    let max = max.max(1);
    let mut ranges = if len == 0 { Vec::new() } else { vec![0..len] };
    while ranges.iter().any(|r| r.len() > max) {
        ranges = ranges.into_iter().flat_map(halve).filter(|r| !r.is_empty()).collect();
    }
    ranges
}

fn halve(range: Range<usize>) -> [Range<usize>; 2] {
    let mid = range.start + range.len().div_ceil(2);
    [range.start..mid, mid..range.end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(len: usize, max: usize) -> Vec<usize> {
        batch_ranges(len, max).into_iter().map(|r| r.len()).collect()
    }

    #[test]
    fn splits_just_over_the_cap_in_half() {
        assert_eq!(sizes(61, 60), vec![31, 30]);
        assert_eq!(sizes(250, 100), vec![63, 62, 63, 62]);
    }

    #[test]
    fn small_inputs_are_a_single_batch() {
        assert_eq!(sizes(100, 100), vec![100]);
        assert_eq!(sizes(1, 100), vec![1]);
        assert!(batch_ranges(0, 100).is_empty());
    }

    #[test]
    fn ranges_are_contiguous() {
        let ranges = batch_ranges(1_000, 7);
        let mut cursor = 0;
        for r in &ranges {
            assert_eq!(r.start, cursor);
            cursor = r.end;
        }
        assert_eq!(cursor, 1_000);
    }

    #[test]
    fn every_batch_is_split_each_round() {
        assert_eq!(sizes(13, 6), vec![4, 3, 3, 3]);
    }

    #[test]
    fn zero_cap_means_one() {
        assert_eq!(sizes(3, 0), vec![1, 1, 1]);
    }
}
