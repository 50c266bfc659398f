use std::cell::Cell;

use rle_core::{widen, Interval, RleError, RleResult, RunKey};

/// A run-length-encoded set of keys: a sorted list of disjoint,
/// non-adjacent closed intervals plus a lazily-computed cardinality.
///
/// Generic over `U: RunKey` so the same logic serves both the 16-bit
/// and 32-bit width variants without duplicating the struct per width.
///
/// # Invariants
///
/// After every public operation returns:
/// 1. `intervals` is strictly sorted by `start`.
/// 2. No two intervals overlap or touch: `intervals[i].last + 1 <
///    intervals[i + 1].start`.
/// 3. Each interval satisfies `start <= last`.
/// 4. When the cardinality cache is valid (`card >= 0`), it equals the
///    sum of the intervals' lengths.
#[derive(Debug)]
pub struct RunContainer<U> {
    pub(crate) intervals: Vec<Interval<U>>,
    /// Cached cardinality; negative means "invalidated, recompute on next
    /// read". A `Cell` rather than a plain field because `cardinality()`
    /// is logically a read — it should not require `&mut self` just to
    /// warm its own cache.
    pub(crate) card: Cell<i64>,
}

impl<U: RunKey> Clone for RunContainer<U> {
    fn clone(&self) -> Self {
        Self {
            intervals: self.intervals.clone(),
            card: Cell::new(self.card.get()),
        }
    }
}

impl<U: RunKey> Default for RunContainer<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: RunKey> RunContainer<U> {
    /// The largest key storable by this width, e.g. `65535` for `u16`.
    pub const MAX_KEY: U = U::MAX_KEY;

    /// An empty container.
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            card: Cell::new(0),
        }
    }

    /// A container holding exactly the closed range `[start, last]`.
    pub fn from_range(start: U, last: U) -> RleResult<Self> {
        let iv = Interval::checked_new(start, last)?;
        Ok(Self {
            intervals: vec![iv],
            card: Cell::new(-1),
        })
    }

    /// Wraps a caller-provided, already-sorted-and-canonicalized interval
    /// list, taking ownership of it. The container neither validates nor
    /// rewrites the list: passing in overlapping, unsorted, or adjacent
    /// (non-maximally-merged) intervals is a programming error whose
    /// effects are unspecified for every operation below.
    pub fn take_ownership(intervals: Vec<Interval<U>>) -> Self {
        Self {
            intervals,
            card: Cell::new(-1),
        }
    }

    /// Number of disjoint runs currently stored.
    #[inline]
    pub fn num_runs(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The underlying canonical interval list, in ascending order.
    #[inline]
    pub fn intervals(&self) -> &[Interval<U>] {
        &self.intervals
    }

    /// Number of distinct keys stored, recomputing and caching if the
    /// cache was invalidated by a prior mutation.
    pub fn cardinality(&self) -> u64 {
        let cached = self.card.get();
        if cached >= 0 {
            return cached as u64;
        }
        let total: u64 = self.intervals.iter().map(|iv| iv.runlen()).sum();
        self.card.set(total as i64);
        total
    }

    pub(crate) fn invalidate_cardinality(&self) {
        self.card.set(-1);
    }

    /// True iff `key` is a member of the set.
    pub fn contains(&self, key: U) -> bool {
        crate::search::search(&self.intervals, key, None).present
    }

    /// Expands the container into a flat, ascending vector of its keys.
    /// Length equals [`cardinality`](Self::cardinality).
    pub fn as_slice(&self) -> Vec<U> {
        let mut out = Vec::with_capacity(self.cardinality() as usize);
        for iv in &self.intervals {
            let mut k = iv.start;
            loop {
                out.push(k);
                if k == iv.last {
                    break;
                }
                k = rle_core::narrow(widen(k) + 1);
            }
        }
        out
    }

    /// The `rank`-th smallest key (0-based). `rank >= cardinality()` is a
    /// precondition violation.
    pub fn select(&self, rank: u64) -> RleResult<U> {
        let card = self.cardinality();
        if rank >= card {
            return Err(RleError::OutOfRange {
                rank,
                cardinality: card,
            });
        }
        let mut offset = 0u64;
        for iv in &self.intervals {
            let len = iv.runlen();
            if rank < offset + len {
                return Ok(rle_core::narrow(widen(iv.start) + (rank - offset)));
            }
            offset += len;
        }
        unreachable!("rank < cardinality but no interval covered it")
    }

    /// Debug-only re-verification of the canonical-form invariants;
    /// exercised by tests after every mutating operation.
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) {
        for w in self.intervals.windows(2) {
            assert!(
                w[0].start < w[1].start,
                "intervals not strictly sorted by start: {:?}, {:?}",
                w[0],
                w[1]
            );
            assert!(
                widen(w[0].last) + 1 < widen(w[1].start),
                "intervals overlap or touch: {:?}, {:?}",
                w[0],
                w[1]
            );
        }
        for iv in &self.intervals {
            assert!(iv.start <= iv.last, "invalid interval {iv:?}");
        }
        let cached = self.card.get();
        if cached >= 0 {
            let actual: u64 = self.intervals.iter().map(|iv| iv.runlen()).sum();
            assert_eq!(cached as u64, actual, "cardinality cache out of sync");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_is_empty() {
        let rc = RunContainer::<u32>::new();
        assert!(rc.is_empty());
        assert_eq!(rc.cardinality(), 0);
        rc.check_invariants();
    }

    #[test]
    fn test_from_range() {
        let rc = RunContainer::<u16>::from_range(4, 9).unwrap();
        assert_eq!(rc.cardinality(), 6);
        assert!(rc.contains(5));
        assert!(!rc.contains(10));
        rc.check_invariants();
    }

    #[test]
    fn test_from_range_rejects_inverted() {
        assert!(RunContainer::<u16>::from_range(9, 4).is_err());
    }

    #[test]
    fn test_max_key_storable() {
        let mut rc = RunContainer::<u16>::new();
        assert!(!rc.contains(u16::MAX));
        rc.add(u16::MAX);
        assert!(rc.contains(u16::MAX));
        rc.remove(u16::MAX);
        assert!(!rc.contains(u16::MAX));
    }

    #[test]
    fn test_as_slice_round_trip() {
        let rc = RunContainer::<u16>::take_ownership(vec![
            Interval::new(0, 0),
            Interval::new(2, 2),
            Interval::new(4, 4),
        ]);
        assert_eq!(rc.as_slice(), vec![0, 2, 4]);
    }

    #[test]
    fn test_select() {
        let rc = RunContainer::<u16>::take_ownership(vec![Interval::new(4, 9)]);
        assert_eq!(rc.select(0).unwrap(), 4);
        assert_eq!(rc.select(5).unwrap(), 9);
        assert!(rc.select(6).is_err());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut a = RunContainer::<u16>::from_range(0, 3).unwrap();
        let b = a.clone();
        a.add(10);
        assert_eq!(b.cardinality(), 4);
        assert_eq!(a.cardinality(), 5);
    }
}
