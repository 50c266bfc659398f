use std::io::{Read, Write};

use rle_core::{RleResult, RunKey};

use crate::codec::WireKey;
use crate::container::RunContainer;

/// Which concrete representation a container uses. A Roaring-style
/// bitmap picks one per block based on density; only `Run` is
/// implemented in this crate, the others are placeholders for the
/// sibling containers it converts to/from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Array,
    Bitmap,
    Run,
}

/// The uniform interface a Roaring-style bitmap needs from any of its
/// per-block container variants (array, dense-bitmap, run). Only
/// [`RunContainer`] implements it in this crate; the other variants are
/// external collaborators.
pub trait Container<U: RunKey> {
    fn contains(&self, key: U) -> bool;
    fn add(&mut self, key: U) -> bool;
    fn remove(&mut self, key: U) -> bool;
    fn cardinality(&self) -> u64;
    fn select(&self, rank: u64) -> RleResult<U>;
    fn clone_container(&self) -> Self;

    fn union_with(&self, other: &Self) -> Self;
    fn intersect_with(&self, other: &Self) -> Self;
    fn and_not_with(&self, other: &Self) -> Self;
    fn xor_with(&self, other: &Self) -> Self;

    fn serialized_size(&self) -> usize;
    fn write_to(&self, w: &mut dyn Write) -> RleResult<()>;
    fn read_from(r: &mut dyn Read) -> RleResult<Self>
    where
        Self: Sized;

    fn container_type_tag(&self) -> ContainerKind;
}

impl<U: WireKey> Container<U> for RunContainer<U> {
    fn contains(&self, key: U) -> bool {
        RunContainer::contains(self, key)
    }

    fn add(&mut self, key: U) -> bool {
        RunContainer::add(self, key)
    }

    fn remove(&mut self, key: U) -> bool {
        RunContainer::remove(self, key)
    }

    fn cardinality(&self) -> u64 {
        RunContainer::cardinality(self)
    }

    fn select(&self, rank: u64) -> RleResult<U> {
        RunContainer::select(self, rank)
    }

    fn clone_container(&self) -> Self {
        self.clone()
    }

    fn union_with(&self, other: &Self) -> Self {
        self.union(other)
    }

    fn intersect_with(&self, other: &Self) -> Self {
        self.intersect(other)
    }

    fn and_not_with(&self, other: &Self) -> Self {
        self.and_not(other)
    }

    fn xor_with(&self, other: &Self) -> Self {
        self.xor(other)
    }

    fn serialized_size(&self) -> usize {
        RunContainer::serialized_size(self)
    }

    fn write_to(&self, w: &mut dyn Write) -> RleResult<()> {
        RunContainer::write_to(self, w)
    }

    fn read_from(r: &mut dyn Read) -> RleResult<Self> {
        RunContainer::read_from(r)
    }

    fn container_type_tag(&self) -> ContainerKind {
        ContainerKind::Run
    }
}
