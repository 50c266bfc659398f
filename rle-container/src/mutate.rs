use rle_core::{narrow, subtract_interval, widen, Interval, IntervalResidual, RunKey};

use crate::container::RunContainer;
use crate::search::search;

impl<U: RunKey> RunContainer<U> {
    /// Adds `k` to the set, fusing with a neighboring run if `k` is
    /// adjacent to one. Returns `true` iff `k` was not already a member.
    pub fn add(&mut self, k: U) -> bool {
        let result = search(&self.intervals, k, None);
        if result.present {
            return false;
        }

        let n = self.intervals.len();
        let idx = result.index;

        if idx < 0 {
            // Before everything. Extend the first interval down, or
            // prepend a new singleton.
            if n > 0 && widen(self.intervals[0].start) == widen(k) + 1 {
                self.intervals[0].start = k;
            } else {
                self.intervals.insert(0, Interval::singleton(k));
            }
        } else if idx as usize >= n - 1 {
            // At or after the last interval.
            let last_idx = n - 1;
            if widen(self.intervals[last_idx].last) + 1 == widen(k) {
                self.intervals[last_idx].last = k;
            } else {
                self.intervals.push(Interval::singleton(k));
            }
        } else {
            let left = idx as usize;
            let right = left + 1;
            let fuses_left = widen(self.intervals[left].last) + 1 == widen(k);
            let fuses_right = widen(self.intervals[right].start) == widen(k) + 1;

            if fuses_left && fuses_right {
                self.intervals[left].last = self.intervals[right].last;
                self.intervals.remove(right);
            } else if fuses_left {
                self.intervals[left].last = k;
            } else if fuses_right {
                self.intervals[right].start = k;
            } else {
                self.intervals.insert(right, Interval::singleton(k));
            }
        }

        if self.card.get() >= 0 {
            self.card.set(self.card.get() + 1);
        }
        true
    }

    /// Removes `k` from the set. Returns `true` iff it was present.
    pub fn remove(&mut self, k: U) -> bool {
        let result = search(&self.intervals, k, None);
        if !result.present {
            return false;
        }
        let index = result.index as usize;
        let pos = widen(k) - widen(self.intervals[index].start);
        self.delete_at(index, pos);
        true
    }

    /// Removes the key at `position_within_interval` slots into
    /// `interval_index`, splitting or shrinking that interval as needed.
    /// Shared by [`remove`](Self::remove) and the cursor's
    /// `remove_current`.
    pub(crate) fn delete_at(&mut self, interval_index: usize, position_within_interval: u64) {
        if self.card.get() >= 0 {
            self.card.set(self.card.get() - 1);
        }
        let iv = self.intervals[interval_index];
        let runlen = iv.runlen();

        if position_within_interval == 0 {
            if iv.start == iv.last {
                self.intervals.remove(interval_index);
            } else {
                self.intervals[interval_index].start = narrow(widen(iv.start) + 1);
            }
        } else if position_within_interval == runlen - 1 {
            self.intervals[interval_index].last = narrow(widen(iv.last) - 1);
        } else {
            let new_left = Interval::new(
                iv.start,
                narrow(widen(iv.start) + position_within_interval - 1),
            );
            let new_right = Interval::new(
                narrow(widen(iv.start) + position_within_interval + 1),
                iv.last,
            );
            self.intervals[interval_index] = new_left;
            self.intervals.insert(interval_index + 1, new_right);
        }
    }

    /// Removes every key in `[del.start, del.last]` from the set,
    /// in place.
    pub fn subtract_range(&mut self, del: Interval<U>) {
        let n = self.intervals.len();
        if n == 0 {
            return;
        }
        let span = Interval::new(self.intervals[0].start, self.intervals[n - 1].last);
        if rle_core::intersect(span, del).is_none() {
            return;
        }

        let start_hit = search(&self.intervals, del.start, None);
        let last_hit = search(&self.intervals, del.last, None);
        self.invalidate_cardinality();

        let istart = start_hit.index;
        let ilast = last_hit.index;

        match (start_hit.present, last_hit.present) {
            (true, true) => {
                let istart = istart as usize;
                let ilast = ilast as usize;
                let (res0, _) = subtract_interval(self.intervals[istart], del);
                let mut residual = res0.into_vec();
                if ilast != istart {
                    let (res1, _) = subtract_interval(self.intervals[ilast], del);
                    residual.extend(res1.into_vec());
                }
                self.splice(istart, ilast, residual);
            }
            (false, false) => {
                // Whole intervals strictly between istart and ilast are
                // fully covered by del and get dropped outright.
                if istart < 0 {
                    // Nothing survives up to ilast inclusive.
                    self.intervals.drain(0..=(ilast as usize));
                } else {
                    let istart = istart as usize;
                    let ilast = ilast as usize;
                    self.intervals.drain(istart + 1..=ilast);
                }
            }
            (true, false) => {
                let istart = istart as usize;
                let ilast = ilast as usize;
                let (res0, _) = subtract_interval(self.intervals[istart], del);
                self.splice(istart, ilast, res0.into_vec());
            }
            (false, true) => {
                let ilast = ilast as usize;
                let (res1, _) = subtract_interval(self.intervals[ilast], del);
                let lo = if istart < 0 { 0 } else { istart as usize + 1 };
                self.splice(lo, ilast, res1.into_vec());
            }
        }
    }

    /// Replaces `self.intervals[from..=to]` with `replacement`, shrinking,
    /// holding steady, or growing the backing vector as needed.
    fn splice(&mut self, from: usize, to: usize, replacement: Vec<Interval<U>>) {
        self.intervals.splice(from..=to, replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rc(ivs: &[(u32, u32)]) -> RunContainer<u32> {
        RunContainer::take_ownership(ivs.iter().map(|&(s, l)| Interval::new(s, l)).collect())
    }

    fn ivs(rc: &RunContainer<u32>) -> Vec<(u32, u32)> {
        rc.intervals().iter().map(|iv| (iv.start, iv.last)).collect()
    }

    #[test]
    fn test_fusion_on_insert() {
        let mut c = rc(&[(0, 4), (6, 9)]);
        assert!(c.add(5));
        assert_eq!(ivs(&c), vec![(0, 9)]);
        assert_eq!(c.cardinality(), 10);
        c.check_invariants();
    }

    #[test]
    fn test_add_not_new() {
        let mut c = rc(&[(0, 4)]);
        assert!(!c.add(2));
        assert_eq!(ivs(&c), vec![(0, 4)]);
    }

    #[test]
    fn test_add_prepend_and_append() {
        let mut c = rc(&[(10, 20)]);
        assert!(c.add(5));
        assert_eq!(ivs(&c), vec![(5, 5), (10, 20)]);
        assert!(c.add(25));
        assert_eq!(ivs(&c), vec![(5, 5), (10, 20), (25, 25)]);
        c.check_invariants();
    }

    #[test]
    fn test_add_extends_first_and_last() {
        let mut c = rc(&[(10, 20)]);
        assert!(c.add(9));
        assert_eq!(ivs(&c), vec![(9, 20)]);
        assert!(c.add(21));
        assert_eq!(ivs(&c), vec![(9, 21)]);
        c.check_invariants();
    }

    #[test]
    fn test_add_at_max_key() {
        let mut c = RunContainer::<u32>::new();
        assert!(c.add(u32::MAX));
        assert!(c.contains(u32::MAX));
        c.check_invariants();
    }

    #[test]
    fn test_middle_cut_on_remove() {
        let mut c = rc(&[(4, 9)]);
        assert_eq!(c.cardinality(), 6);
        assert!(c.remove(5));
        assert_eq!(ivs(&c), vec![(4, 4), (6, 9)]);
        assert_eq!(c.cardinality(), 5);
        c.check_invariants();
    }

    #[test]
    fn test_remove_singleton_drops_interval() {
        let mut c = rc(&[(4, 4), (6, 9)]);
        assert!(c.remove(4));
        assert_eq!(ivs(&c), vec![(6, 9)]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut c = rc(&[(4, 9)]);
        assert!(!c.remove(100));
        assert_eq!(ivs(&c), vec![(4, 9)]);
    }

    #[test]
    fn test_round_trip_at_boundary() {
        let mut c = RunContainer::<u32>::new();
        for k in [u32::MAX - 2, u32::MAX - 1, u32::MAX] {
            c.add(k);
        }
        assert_eq!(ivs(&c), vec![(u32::MAX - 2, u32::MAX)]);
        assert_eq!(c.cardinality(), 3);

        assert!(c.remove(u32::MAX - 1));
        assert_eq!(ivs(&c), vec![(u32::MAX - 2, u32::MAX - 2), (u32::MAX, u32::MAX)]);
        assert_eq!(c.cardinality(), 2);
        c.check_invariants();
    }

    #[test]
    fn test_subtract_range_both_inside_middle_cut() {
        let mut c = rc(&[(0, 20)]);
        c.subtract_range(Interval::new(8, 9));
        assert_eq!(ivs(&c), vec![(0, 7), (10, 20)]);
        c.check_invariants();
    }

    #[test]
    fn test_subtract_range_drops_whole_intervals() {
        let mut c = rc(&[(0, 2), (10, 12), (20, 22), (30, 32)]);
        c.subtract_range(Interval::new(5, 25));
        assert_eq!(ivs(&c), vec![(0, 2), (30, 32)]);
        c.check_invariants();
    }

    #[test]
    fn test_subtract_range_start_inside_last_outside() {
        let mut c = rc(&[(0, 10), (20, 22)]);
        c.subtract_range(Interval::new(5, 15));
        assert_eq!(ivs(&c), vec![(0, 4), (20, 22)]);
        c.check_invariants();
    }

    #[test]
    fn test_subtract_range_start_outside_last_inside() {
        let mut c = rc(&[(0, 2), (10, 20)]);
        c.subtract_range(Interval::new(5, 15));
        assert_eq!(ivs(&c), vec![(0, 2), (16, 20)]);
        c.check_invariants();
    }

    #[test]
    fn test_subtract_range_disjoint_is_noop() {
        let mut c = rc(&[(10, 20)]);
        c.subtract_range(Interval::new(100, 200));
        assert_eq!(ivs(&c), vec![(10, 20)]);
    }

    #[test]
    fn test_subtract_range_covers_everything() {
        let mut c = rc(&[(0, 2), (10, 12)]);
        c.subtract_range(Interval::new(0, 100));
        assert!(c.is_empty());
    }

    #[test]
    fn test_subtract_range_both_present_two_residuals() {
        let mut c = rc(&[(0, 20)]);
        c.subtract_range(Interval::new(8, 8));
        assert_eq!(ivs(&c), vec![(0, 7), (9, 20)]);
        c.check_invariants();
    }
}
