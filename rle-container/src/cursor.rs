use rle_core::{RleError, RleResult, RunKey};

use crate::container::RunContainer;

/// A forward cursor over a container's keys, in ascending order.
///
/// Holds the container by exclusive reference so `remove_current` can
/// mutate through the cursor directly; a container must not be mutated
/// through any other path while a cursor over it is live.
pub struct Cursor<'a, U> {
    container: &'a mut RunContainer<U>,
    interval_index: isize,
    position_within_interval: u64,
    sequence_number: i64,
}

impl<'a, U: RunKey> Cursor<'a, U> {
    pub fn new(container: &'a mut RunContainer<U>) -> Self {
        Self {
            container,
            interval_index: -1,
            position_within_interval: 0,
            sequence_number: -1,
        }
    }

    /// True iff there is at least one more key to advance to.
    pub fn has_next(&self) -> bool {
        if self.container.is_empty() {
            return false;
        }
        self.sequence_number + 1 < self.container.cardinality() as i64
    }

    /// Moves to the next key. Fails with [`RleError::ExhaustedIterator`]
    /// if [`has_next`](Self::has_next) is false.
    pub fn advance(&mut self) -> RleResult<()> {
        if !self.has_next() {
            return Err(RleError::ExhaustedIterator);
        }

        if self.interval_index < 0 {
            self.interval_index = 0;
            self.position_within_interval = 0;
        } else {
            let idx = self.interval_index as usize;
            let runlen = self.container.intervals[idx].runlen();
            if self.position_within_interval + 1 < runlen {
                self.position_within_interval += 1;
            } else {
                self.interval_index += 1;
                self.position_within_interval = 0;
            }
        }
        self.sequence_number += 1;
        Ok(())
    }

    /// The key at the cursor's current position. Panics if `advance` has
    /// never been called or the cursor is past the last live key; callers
    /// should check [`has_next`](Self::has_next) (or rely on `advance`'s
    /// own error) before calling this.
    pub fn current(&self) -> U {
        let idx = self.interval_index as usize;
        let iv = self.container.intervals[idx];
        rle_core::narrow(rle_core::widen(iv.start) + self.position_within_interval)
    }

    /// Removes the key at the cursor's current position and returns it.
    /// Leaves the cursor positioned so a subsequent `advance` yields the
    /// next surviving key.
    pub fn remove_current(&mut self) -> RleResult<U> {
        if self.interval_index < 0 {
            return Err(RleError::ExhaustedIterator);
        }
        let removed = self.current();
        let idx = self.interval_index as usize;
        let pos = self.position_within_interval;

        self.container.delete_at(idx, pos);
        self.sequence_number -= 1;

        // Re-anchor at whatever key now holds `sequence_number`'s rank,
        // so the next `advance` steps onto the key right after the one
        // just removed. `sequence_number < 0` means back to pre-first.
        if self.sequence_number < 0 {
            self.interval_index = -1;
            self.position_within_interval = 0;
        } else {
            let mut rank = self.sequence_number as u64;
            for (i, iv) in self.container.intervals.iter().enumerate() {
                let len = iv.runlen();
                if rank < len {
                    self.interval_index = i as isize;
                    self.position_within_interval = rank;
                    break;
                }
                rank -= len;
            }
        }

        Ok(removed)
    }
}

impl<U: RunKey> RunContainer<U> {
    pub fn cursor(&mut self) -> Cursor<'_, U> {
        Cursor::new(self)
    }
}
