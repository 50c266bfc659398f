//! # rle-core
//!
//! Shared primitives for run-length-encoded bitmap containers.
//!
//! ## Purpose
//!
//! This crate is the single source of truth for the closed-interval
//! arithmetic (`can_merge`, `have_overlap`, `merge`, `intersect`,
//! `subtract_interval`) that `rle-container` builds its run containers
//! on top of, plus the error type shared across that crate's fallible
//! operations.
//!
//! ## Design philosophy
//!
//! All interval-level arithmetic lives here; `rle-container` should not
//! reimplement it. Widening to `u64` before `+1` (see [`key::widen`]) is
//! mandatory wherever an interval's `last` could be the key type's
//! maximum value.
//!
//! ## Main components
//!
//! - [`Interval`] — a closed `[start, last]` range over a [`RunKey`].
//! - [`RunKey`] — the trait bounding which unsigned widths (`u16`, `u32`)
//!   a run container can store.
//! - [`RleError`] — the error enum raised by precondition violations and
//!   malformed serialized input.

pub mod error;
pub mod interval;
pub mod key;

pub use error::{RleError, RleResult};
pub use interval::{can_merge, have_overlap, intersect, merge, subtract_interval, Interval, IntervalResidual};
pub use key::{narrow, try_narrow, widen, RunKey};
