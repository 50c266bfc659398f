use std::cmp::Ordering;

use crate::error::{RleError, RleResult};
use crate::key::{widen, RunKey};

/// A closed interval `[start, last]` of keys, denoting `{start, start+1,
/// ..., last}`. Invariant: `start <= last`.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Interval<U> {
    pub start: U,
    pub last: U,
}

impl<U: RunKey> Interval<U> {
    /// Builds `[start, last]`. Does not check `start <= last` — callers
    /// that may pass invalid bounds should go through
    /// [`Interval::checked_new`] instead.
    #[inline]
    pub fn new(start: U, last: U) -> Self {
        Self { start, last }
    }

    /// Builds `[start, last]`, rejecting `start > last`.
    pub fn checked_new(start: U, last: U) -> RleResult<Self> {
        if start > last {
            return Err(RleError::PreconditionViolated(format!(
                "interval start {start:?} is after last {last:?}"
            )));
        }
        Ok(Self { start, last })
    }

    /// A single-key interval `[k, k]`.
    #[inline]
    pub fn singleton(k: U) -> Self {
        Self { start: k, last: k }
    }

    /// Number of keys the interval covers, widened so `last == U::MAX_KEY`
    /// does not overflow.
    #[inline]
    pub fn runlen(&self) -> u64 {
        widen(self.last) - widen(self.start) + 1
    }

    #[inline]
    pub fn contains(&self, key: U) -> bool {
        self.start <= key && key <= self.last
    }
}

impl<U: RunKey> PartialEq for Interval<U> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.last == other.last
    }
}

impl<U: RunKey> PartialOrd for Interval<U> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<U: RunKey> Ord for Interval<U> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start.cmp(&other.start).then(self.last.cmp(&other.last))
    }
}

/// True iff `a` and `b` overlap or are adjacent (touch with no gap), i.e.
/// their union is itself one interval.
#[inline]
pub fn can_merge<U: RunKey>(a: Interval<U>, b: Interval<U>) -> bool {
    if widen(a.last) + 1 < widen(b.start) {
        return false;
    }
    widen(b.last) + 1 >= widen(a.start)
}

/// True iff `a` and `b` share at least one key.
#[inline]
pub fn have_overlap<U: RunKey>(a: Interval<U>, b: Interval<U>) -> bool {
    if widen(a.last) + 1 <= widen(b.start) {
        return false;
    }
    widen(b.last) + 1 > widen(a.start)
}

/// Joins `a` and `b` into the single interval spanning both. Requires
/// [`can_merge`]; fails otherwise rather than silently producing a
/// superset that includes keys neither interval had.
pub fn merge<U: RunKey>(a: Interval<U>, b: Interval<U>) -> RleResult<Interval<U>> {
    if !can_merge(a, b) {
        return Err(RleError::PreconditionViolated(format!(
            "cannot merge disjoint, non-adjacent intervals {a:?} and {b:?}"
        )));
    }
    Ok(Interval {
        start: a.start.min(b.start),
        last: a.last.max(b.last),
    })
}

/// The intersection of `a` and `b`, or `None` if they are disjoint.
#[inline]
pub fn intersect<U: RunKey>(a: Interval<U>, b: Interval<U>) -> Option<Interval<U>> {
    if !have_overlap(a, b) {
        return None;
    }
    Some(Interval {
        start: a.start.max(b.start),
        last: a.last.min(b.last),
    })
}

/// The 0, 1, or 2 intervals left after removing `del` from `cur`, avoiding
/// a heap allocation for the common cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalResidual<U> {
    /// `del` covered all of `cur`.
    None,
    /// A single interval remains (left or right truncation, or `del` was
    /// disjoint from `cur` and `cur` is untouched).
    One(Interval<U>),
    /// `del` cut `cur` into two disjoint pieces.
    Two(Interval<U>, Interval<U>),
}

impl<U: RunKey> IntervalResidual<U> {
    /// Collects the residual into a `Vec`, for callers that want a
    /// uniform slice-like shape (e.g. splicing into a container's
    /// interval list).
    pub fn into_vec(self) -> Vec<Interval<U>> {
        match self {
            IntervalResidual::None => Vec::new(),
            IntervalResidual::One(a) => vec![a],
            IntervalResidual::Two(a, b) => vec![a, b],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IntervalResidual::None => 0,
            IntervalResidual::One(_) => 1,
            IntervalResidual::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `cur \ del`: the keys of `cur` that are not in `del`, plus the count of
/// keys actually removed.
pub fn subtract_interval<U: RunKey>(cur: Interval<U>, del: Interval<U>) -> (IntervalResidual<U>, u64) {
    let Some(isect) = intersect(cur, del) else {
        return (IntervalResidual::One(cur), 0);
    };

    // del entirely covers cur.
    if del.start <= cur.start && cur.last <= del.last {
        return (IntervalResidual::None, cur.runlen());
    }

    let removed = isect.runlen();
    if isect.start > cur.start && isect.last < cur.last {
        let left = Interval::new(cur.start, narrow_dec(isect.start));
        let right = Interval::new(narrow_inc(isect.last), cur.last);
        (IntervalResidual::Two(left, right), removed)
    } else if isect.start == cur.start {
        // left truncation: the surviving piece starts just past isect.
        (
            IntervalResidual::One(Interval::new(narrow_inc(isect.last), cur.last)),
            removed,
        )
    } else {
        // right truncation: isect.last == cur.last.
        (
            IntervalResidual::One(Interval::new(cur.start, narrow_dec(isect.start))),
            removed,
        )
    }
}

#[inline]
fn narrow_inc<U: RunKey>(x: U) -> U {
    crate::key::narrow(widen(x) + 1)
}

#[inline]
fn narrow_dec<U: RunKey>(x: U) -> U {
    crate::key::narrow(widen(x) - 1)
}
