use num_traits::Zero;
use rle_core::{can_merge, narrow, widen, Interval, RunKey};

use crate::container::RunContainer;
use crate::search::{search, SearchOptions};

impl<U: RunKey> RunContainer<U> {
    /// The set of keys in either `self` or `other`.
    pub fn union(&self, other: &Self) -> Self {
        let a = self.intervals.as_slice();
        let b = other.intervals.as_slice();
        let mut out: Vec<Interval<U>> = Vec::with_capacity(a.len() + b.len());

        let mut na = 0usize;
        let mut nb = 0usize;
        let mut acc: Option<Interval<U>> = None;

        loop {
            let head = match (a.get(na), b.get(nb)) {
                (None, None) => break,
                (Some(&x), None) => {
                    na += 1;
                    x
                }
                (None, Some(&y)) => {
                    nb += 1;
                    y
                }
                (Some(&x), Some(&y)) => {
                    if x.start <= y.start {
                        na += 1;
                        x
                    } else {
                        nb += 1;
                        y
                    }
                }
            };

            let mut cur = match acc {
                None => head,
                Some(prev) => {
                    if can_merge(prev, head) {
                        Interval::new(prev.start.min(head.start), prev.last.max(head.last))
                    } else {
                        out.push(prev);
                        head
                    }
                }
            };

            // Skip-advance: binary-search ahead on each side for the
            // first interval `cur` cannot reach, jumping past every
            // interval already known to fuse with `cur` in one step
            // instead of folding them in one at a time.
            loop {
                let mut grew = false;
                let probe = if cur.last < Self::MAX_KEY {
                    narrow(widen(cur.last) + 1)
                } else {
                    cur.last
                };

                if let Some(&bv) = b.get(nb) {
                    if can_merge(cur, bv) {
                        let r = search(b, probe, Some(SearchOptions { start_index: nb, end_exclusive_index: None }));
                        let j = if r.index >= nb as isize { r.index as usize } else { nb };
                        cur.last = cur.last.max(b[j].last);
                        nb = j + 1;
                        grew = true;
                    }
                }
                if let Some(&av) = a.get(na) {
                    if can_merge(cur, av) {
                        let r = search(a, probe, Some(SearchOptions { start_index: na, end_exclusive_index: None }));
                        let j = if r.index >= na as isize { r.index as usize } else { na };
                        cur.last = cur.last.max(a[j].last);
                        na = j + 1;
                        grew = true;
                    }
                }
                if !grew {
                    break;
                }
            }

            acc = Some(cur);
        }
        if let Some(cur) = acc {
            out.push(cur);
        }

        Self::take_ownership(out)
    }

    /// The set of keys in both `self` and `other`.
    pub fn intersect(&self, other: &Self) -> Self {
        let a = self.intervals.as_slice();
        let b = other.intervals.as_slice();
        let mut out: Vec<Interval<U>> = Vec::new();

        let mut na = 0usize;
        let mut nb = 0usize;
        // Effective start of the current a/b interval, which may have
        // been advanced past a prior intersection without moving the
        // cursor, so a second overlap against the same interval on the
        // other side is still found.
        let mut a_start: Option<U> = None;
        let mut b_start: Option<U> = None;

        while na < a.len() && nb < b.len() {
            let av = a[na];
            let bv = b[nb];
            let astart = a_start.unwrap_or(av.start);
            let bstart = b_start.unwrap_or(bv.start);

            if av.last < bstart {
                // Skip-advance: jump straight to the first `a` interval
                // that could reach `bstart`, rather than stepping past
                // each fully-disjoint one in turn.
                let r = search(a, bstart, Some(SearchOptions { start_index: na, end_exclusive_index: None }));
                na = if r.present { r.index as usize } else { (r.index + 1) as usize };
                a_start = None;
                continue;
            }
            if bv.last < astart {
                let r = search(b, astart, Some(SearchOptions { start_index: nb, end_exclusive_index: None }));
                nb = if r.present { r.index as usize } else { (r.index + 1) as usize };
                b_start = None;
                continue;
            }

            let istart = astart.max(bstart);
            let ilast = av.last.min(bv.last);
            out.push(Interval::new(istart, ilast));

            if av.last > bv.last {
                a_start = Some(narrow(widen(bv.last) + 1));
                nb += 1;
                b_start = None;
            } else if bv.last > av.last {
                b_start = Some(narrow(widen(av.last) + 1));
                na += 1;
                a_start = None;
            } else {
                na += 1;
                nb += 1;
                a_start = None;
                b_start = None;
            }
        }

        Self::take_ownership(out)
    }

    /// The set of keys in `self` but not in `other`.
    pub fn and_not(&self, other: &Self) -> Self {
        let a = self.intervals.as_slice();
        let b = other.intervals.as_slice();
        let mut out: Vec<Interval<U>> = Vec::new();

        if a.is_empty() {
            return Self::new();
        }

        let mut na = 0usize;
        let mut nb = 0usize;
        let mut astart = a[0].start;
        let mut alast = a[0].last;

        while na < a.len() {
            if nb >= b.len() {
                out.push(Interval::new(astart, alast));
                na += 1;
                if na < a.len() {
                    astart = a[na].start;
                    alast = a[na].last;
                }
                continue;
            }

            let bv = b[nb];
            if alast < bv.start {
                out.push(Interval::new(astart, alast));
                na += 1;
                if na < a.len() {
                    astart = a[na].start;
                    alast = a[na].last;
                }
            } else if bv.last < astart {
                // Skip-advance: jump `b` straight to the first interval
                // that could reach `astart`, instead of stepping past
                // each fully-disjoint one in turn.
                let r = search(b, astart, Some(SearchOptions { start_index: nb, end_exclusive_index: None }));
                nb = if r.present { r.index as usize } else { (r.index + 1) as usize };
            } else {
                // overlap
                if astart < bv.start {
                    out.push(Interval::new(astart, narrow(widen(bv.start) - 1)));
                }
                if alast > bv.last {
                    astart = narrow(widen(bv.last) + 1);
                    nb += 1;
                } else {
                    na += 1;
                    if na < a.len() {
                        astart = a[na].start;
                        alast = a[na].last;
                    }
                }
            }
        }

        Self::take_ownership(out)
    }

    /// The set of keys in exactly one of `self`, `other`.
    pub fn xor(&self, other: &Self) -> Self {
        self.and_not(other).union(&other.and_not(self))
    }

    /// The complement of this set within `[0, U::MAX_KEY]`.
    pub fn invert(&self) -> Self {
        if self.is_empty() {
            return Self::from_range(U::zero(), Self::MAX_KEY)
                .expect("0 <= MAX_KEY always holds");
        }

        let mut out = Vec::with_capacity(self.intervals.len() + 1);
        let first = self.intervals[0];
        if first.start > U::zero() {
            out.push(Interval::new(U::zero(), narrow(widen(first.start) - 1)));
        }

        for w in self.intervals.windows(2) {
            let gap_start = narrow(widen(w[0].last) + 1);
            let gap_last = narrow(widen(w[1].start) - 1);
            out.push(Interval::new(gap_start, gap_last));
        }

        let last = self.intervals[self.intervals.len() - 1];
        if last.last < Self::MAX_KEY {
            out.push(Interval::new(narrow(widen(last.last) + 1), Self::MAX_KEY));
        }

        Self::take_ownership(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::prelude::*;
    use std::collections::HashSet;

    fn rc(ivs: &[(u32, u32)]) -> RunContainer<u32> {
        RunContainer::take_ownership(ivs.iter().map(|&(s, l)| Interval::new(s, l)).collect())
    }

    fn ivs(rc: &RunContainer<u32>) -> Vec<(u32, u32)> {
        rc.intervals().iter().map(|iv| (iv.start, iv.last)).collect()
    }

    #[test]
    fn test_union_across_wide_gaps() {
        let a = rc(&[(0, 0), (2, 2), (4, 4)]);
        let b = rc(&[(6, 7), (10, 11), (u32::MAX, u32::MAX)]);
        let u = a.union(&b);
        assert_eq!(u.cardinality(), 8);
        assert_eq!(u.num_runs(), 6);
        assert_eq!(
            u.as_slice(),
            vec![0, 2, 4, 6, 7, 10, 11, u32::MAX]
        );
    }

    #[test]
    fn test_union_fuses_overlapping() {
        let a = rc(&[(0, 5)]);
        let b = rc(&[(3, 10)]);
        let u = a.union(&b);
        assert_eq!(ivs(&u), vec![(0, 10)]);
    }

    #[test]
    fn test_union_one_side_swallows_many() {
        let a = rc(&[(0, 100)]);
        let b = rc(&[(5, 6), (10, 11), (20, 21), (50, 60), (200, 210)]);
        let u = a.union(&b);
        assert_eq!(ivs(&u), vec![(0, 100), (200, 210)]);
    }

    #[test]
    fn test_intersection_with_splits() {
        let e = rc(&[(2, 4), (8, 9), (14, 16), (20, 22)]);
        let f = rc(&[(3, 18), (22, 23)]);
        let ef = e.intersect(&f);
        assert_eq!(ef.cardinality(), 8);
        assert_eq!(ef.as_slice(), vec![3, 4, 8, 9, 14, 15, 16, 22]);

        let fe = f.intersect(&e);
        assert_eq!(fe.as_slice(), ef.as_slice());
    }

    #[test]
    fn test_intersect_self_is_self() {
        let a = rc(&[(0, 5), (10, 20)]);
        let i = a.intersect(&a);
        assert_eq!(ivs(&i), ivs(&a));
    }

    #[test]
    fn test_union_self_is_self() {
        let a = rc(&[(0, 5), (10, 20)]);
        let u = a.union(&a);
        assert_eq!(ivs(&u), ivs(&a));
    }

    #[test]
    fn test_and_not_self_is_empty() {
        let a = rc(&[(0, 5), (10, 20)]);
        let d = a.and_not(&a);
        assert!(d.is_empty());
    }

    #[test]
    fn test_and_not_disjoint_is_identity() {
        let a = rc(&[(0, 5)]);
        let b = rc(&[(10, 20)]);
        let d = a.and_not(&b);
        assert_eq!(ivs(&d), ivs(&a));
    }

    #[test]
    fn test_and_not_splits_middle() {
        let a = rc(&[(0, 20)]);
        let b = rc(&[(8, 9)]);
        let d = a.and_not(&b);
        assert_eq!(ivs(&d), vec![(0, 7), (10, 20)]);
    }

    #[test]
    fn test_and_not_skips_many_disjoint_b_intervals() {
        let a = rc(&[(100, 110)]);
        let b = rc(&[(0, 1), (10, 11), (50, 60), (105, 106)]);
        let d = a.and_not(&b);
        assert_eq!(ivs(&d), vec![(100, 104), (107, 110)]);
    }

    #[test]
    fn test_xor_self_is_empty() {
        let a = rc(&[(0, 5), (10, 20)]);
        assert!(a.xor(&a).is_empty());
    }

    #[test]
    fn test_xor_disjoint_is_union() {
        let a = rc(&[(0, 5)]);
        let b = rc(&[(10, 20)]);
        assert_eq!(ivs(&a.xor(&b)), ivs(&a.union(&b)));
    }

    #[test]
    fn test_xor_partial_overlap() {
        let a = rc(&[(0, 10)]);
        let b = rc(&[(5, 15)]);
        let x = a.xor(&b);
        assert_eq!(ivs(&x), vec![(0, 4), (11, 15)]);
    }

    #[test]
    fn test_invert_empty_is_full_range() {
        let a = RunContainer::<u16>::new();
        let inv = a.invert();
        assert_eq!(ivs_u16(&inv), vec![(0, u16::MAX)]);
    }

    #[test]
    fn test_invert_full_range_is_empty() {
        let a = RunContainer::<u16>::from_range(0, u16::MAX).unwrap();
        let inv = a.invert();
        assert!(inv.is_empty());
    }

    #[test]
    fn test_invert_is_involution() {
        let a = rc(&[(0, 3), (10, 10), (u32::MAX, u32::MAX)]);
        let inv = a.invert();
        let inv2 = inv.invert();
        assert_eq!(ivs(&inv2), ivs(&a));
    }

    #[test]
    fn test_invert_skips_leading_gap_when_starts_at_zero() {
        let a = rc(&[(0, 4), (10, 20)]);
        let inv = a.invert();
        assert_eq!(ivs(&inv), vec![(5, 9), (21, u32::MAX)]);
    }

    fn ivs_u16(rc: &RunContainer<u16>) -> Vec<(u16, u16)> {
        rc.intervals().iter().map(|iv| (iv.start, iv.last)).collect()
    }

    #[test]
    fn test_set_algebra_matches_reference_hashset() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..50 {
            let mut a_keys: HashSet<u16> = HashSet::new();
            let mut b_keys: HashSet<u16> = HashSet::new();
            for _ in 0..40 {
                a_keys.insert(rng.random_range(0..500));
            }
            for _ in 0..40 {
                b_keys.insert(rng.random_range(0..500));
            }

            let mut a_sorted: Vec<u16> = a_keys.iter().copied().collect();
            let mut b_sorted: Vec<u16> = b_keys.iter().copied().collect();
            a_sorted.sort_unstable();
            b_sorted.sort_unstable();

            let a = RunContainer::from_sorted_keys(&a_sorted).unwrap();
            let b = RunContainer::from_sorted_keys(&b_sorted).unwrap();

            let mut expect_union: Vec<u16> = a_keys.union(&b_keys).copied().collect();
            expect_union.sort_unstable();
            assert_eq!(a.union(&b).as_slice(), expect_union);

            let mut expect_inter: Vec<u16> = a_keys.intersection(&b_keys).copied().collect();
            expect_inter.sort_unstable();
            assert_eq!(a.intersect(&b).as_slice(), expect_inter);

            let mut expect_diff: Vec<u16> = a_keys.difference(&b_keys).copied().collect();
            expect_diff.sort_unstable();
            assert_eq!(a.and_not(&b).as_slice(), expect_diff);

            let mut expect_xor: Vec<u16> = a_keys.symmetric_difference(&b_keys).copied().collect();
            expect_xor.sort_unstable();
            assert_eq!(a.xor(&b).as_slice(), expect_xor);
        }
    }
}
