//! # rle-container
//!
//! A run-length-encoded container for compressed bitmaps: a sorted list
//! of disjoint, non-adjacent closed intervals with fast membership,
//! point mutation, set algebra, and a compact binary wire format.
//!
//! ## Main components
//!
//! - [`RunContainer`] — the value type, generic over [`rle_core::RunKey`].
//! - [`RunContainer16`] / [`RunContainer32`] — the two concrete widths a
//!   Roaring-style bitmap actually stores.
//! - [`search::search`] — window-hinted binary search, used both for
//!   membership and to accelerate the merge walks in [`setops`].
//! - [`Cursor`] — forward iteration with in-place removal.
//! - [`Container`] / [`ContainerKind`] — the interface a containing
//!   bitmap uses uniformly across its run/array/bitmap variants.

pub mod codec;
pub mod container;
pub mod container_trait;
pub mod convert;
pub mod cursor;
pub mod mutate;
pub mod search;
pub mod setops;

pub use codec::WireKey;
pub use container::RunContainer;
pub use container_trait::{Container, ContainerKind};
pub use convert::{DenseBitmapSource, SortedArraySource};
pub use cursor::Cursor;
pub use search::{SearchOptions, SearchResult};

pub use rle_core::{widen, narrow, try_narrow, Interval, IntervalResidual, RleError, RleResult, RunKey};

/// A run container over 16-bit keys, the per-block variant used inside
/// a Roaring bitmap.
pub type RunContainer16 = RunContainer<u16>;

/// A run container over 32-bit keys, a standalone compact integer set.
pub type RunContainer32 = RunContainer<u32>;
