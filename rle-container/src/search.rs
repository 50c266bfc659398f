use rle_core::{Interval, RunKey};

/// Restricts a [`search`] to the index window `[start_index,
/// end_exclusive_index)`, letting a merge walk that already knows a
/// lower bound on the next hit skip re-scanning everything before it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub start_index: usize,
    /// `None` means "no upper bound", i.e. the full interval count.
    pub end_exclusive_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// - If `present`, the index of the interval containing `key`.
    /// - Otherwise, the index of the rightmost interval strictly before
    ///   `key`, or `-1` if `key` precedes the first interval. Always
    ///   `< intervals.len() as isize`.
    pub index: isize,
    pub present: bool,
    /// Number of comparisons the binary search performed; exposed so
    /// tests can confirm a narrower window hint actually does less work.
    pub compare_count: usize,
}

/// Binary-searches `intervals` (sorted by `start`) for `key`.
pub fn search<U: RunKey>(
    intervals: &[Interval<U>],
    key: U,
    opts: Option<SearchOptions>,
) -> SearchResult {
    let n = intervals.len();
    if n == 0 {
        return SearchResult {
            index: -1,
            present: false,
            compare_count: 0,
        };
    }

    let opts = opts.unwrap_or_default();
    let mut i = opts.start_index;
    let mut j = opts.end_exclusive_index.unwrap_or(n);
    let mut compare_count = 0usize;

    // Smallest index `i` in `[i, j)` such that `key < intervals[i].start`,
    // inlined rather than calling a generic binary-search helper so we
    // can count comparisons for the window-hint test.
    while i < j {
        let h = i + (j - i) / 2;
        compare_count += 1;
        if key >= intervals[h].start {
            i = h + 1;
        } else {
            j = h;
        }
    }
    let below = i;
    let which = below as isize - 1;

    if below == n {
        if intervals[n - 1].contains(key) {
            return SearchResult {
                index: which,
                present: true,
                compare_count,
            };
        }
        return SearchResult {
            index: which,
            present: false,
            compare_count,
        };
    }

    if below == 0 {
        return SearchResult {
            index: -1,
            present: false,
            compare_count,
        };
    }

    // INVAR: intervals[below - 1].start <= key < intervals[below].start
    if intervals[below - 1].contains(key) {
        return SearchResult {
            index: which,
            present: true,
            compare_count,
        };
    }
    SearchResult {
        index: which,
        present: false,
        compare_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Interval<u32>> {
        (1..=12u32)
            .map(|i| Interval::new(i * 10, i * 10 + 2))
            .collect()
    }

    #[test]
    fn test_before_first() {
        let ivs = sample();
        let before = search(&ivs, 5, None);
        assert!(!before.present);
        assert_eq!(before.index, -1);

        let between = search::<u32>(&ivs, 15, None);
        assert_eq!(between.index, 0);
        assert!(!between.present);
    }

    #[test]
    fn test_inside_some() {
        let ivs = sample();
        let r = search(&ivs, 41, None);
        assert!(r.present);
        assert_eq!(r.index, 3);
    }

    #[test]
    fn test_after_last() {
        let ivs = sample();
        let r = search(&ivs, 1000, None);
        assert!(!r.present);
        assert_eq!(r.index, ivs.len() as isize - 1);
    }

    #[test]
    fn test_window_hint_reduces_comparisons() {
        let ivs = sample();
        // Key 100 lives at index 9 (interval [100, 102]).
        let full = search(&ivs, 100, None);
        assert!(full.present);
        assert_eq!(full.index, 9);

        let hinted = search(
            &ivs,
            100,
            Some(SearchOptions {
                start_index: 5,
                end_exclusive_index: None,
            }),
        );
        assert!(hinted.present);
        assert_eq!(hinted.index, 9);
        assert!(hinted.compare_count < full.compare_count);
    }
}
