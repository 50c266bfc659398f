use rle_core::{widen, Interval, RleError, RleResult, RunKey};

use crate::container::RunContainer;

/// A sorted-array sibling container, as consumed during conversion.
/// Exposes only what a run container needs: an ordered key sequence.
pub trait SortedArraySource<U> {
    /// Keys in strictly ascending order.
    fn sorted_keys(&self) -> &[U];
}

/// A dense-bitmap sibling container, as consumed during conversion.
/// Exposes a forward iterator over its set bits; a run container must
/// drive construction off this iterator's own exhaustion rather than a
/// separately tracked count, since the two can disagree at the edges.
pub trait DenseBitmapSource<U> {
    type Iter: Iterator<Item = U>;

    fn set_bits(&self) -> Self::Iter;
}

impl<U: RunKey> RunContainer<U> {
    /// Builds a container from an arbitrary key list, sorting it first.
    /// Rejects nothing; duplicates collapse naturally during the run scan.
    pub fn from_keys(keys: &[U]) -> Self {
        let mut sorted = keys.to_vec();
        sorted.sort_unstable();
        Self::scan_sorted(sorted.into_iter())
    }

    /// Builds a container from a key list the caller asserts is already
    /// sorted ascending. Verifies the assertion and fails with
    /// [`RleError::PreconditionViolated`] if it does not hold.
    pub fn from_sorted_keys(keys: &[U]) -> RleResult<Self> {
        for w in keys.windows(2) {
            if w[0] > w[1] {
                return Err(RleError::PreconditionViolated(format!(
                    "from_sorted_keys: {:?} is not <= {:?}",
                    w[0], w[1]
                )));
            }
        }
        Ok(Self::scan_sorted(keys.iter().copied()))
    }

    /// Builds a container from a sorted-array sibling's key sequence.
    pub fn from_sorted_array<S: SortedArraySource<U>>(source: &S) -> Self {
        Self::scan_sorted(source.sorted_keys().iter().copied())
    }

    /// Builds a container from a dense-bitmap sibling's set-bit iterator.
    /// Keys yielded by `source.set_bits()` must already be in ascending
    /// order; the iterator drives the scan directly rather than through
    /// a separately maintained count.
    pub fn from_dense_bitmap<S: DenseBitmapSource<U>>(source: &S) -> Self {
        Self::scan_sorted(source.set_bits())
    }

    /// Shared run-accumulation scan: given an ascending key iterator,
    /// collapse consecutive runs into intervals, skipping duplicates.
    fn scan_sorted(mut keys: impl Iterator<Item = U>) -> Self {
        let mut intervals: Vec<Interval<U>> = Vec::new();
        let Some(first) = keys.next() else {
            return Self::new();
        };

        let mut run_start = first;
        let mut run_last = first;

        for k in keys {
            if k == run_last {
                continue;
            }
            if widen(run_last) + 1 == widen(k) {
                run_last = k;
            } else {
                intervals.push(Interval::new(run_start, run_last));
                run_start = k;
                run_last = k;
            }
        }
        intervals.push(Interval::new(run_start, run_last));

        Self::take_ownership(intervals)
    }
}
