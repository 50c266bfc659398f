use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use num_traits::NumCast;
use rle_core::{widen, Interval, RleError, RleResult, RunKey};

use crate::container::RunContainer;

/// Key widths this crate knows how to put on the wire. Sealed to `u16`
/// and `u32`: any other `RunKey` impl would need a matching byteorder
/// read/write pair added here.
pub trait WireKey: RunKey {
    const BYTES: usize;

    fn write_wire<W: Write>(self, w: &mut W) -> io::Result<()>;
    fn read_wire<R: Read>(r: &mut R) -> io::Result<Self>;
}

impl WireKey for u16 {
    const BYTES: usize = 2;

    fn write_wire<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_u16::<LittleEndian>(self)
    }

    fn read_wire<R: Read>(r: &mut R) -> io::Result<Self> {
        r.read_u16::<LittleEndian>()
    }
}

impl WireKey for u32 {
    const BYTES: usize = 4;

    fn write_wire<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self)
    }

    fn read_wire<R: Read>(r: &mut R) -> io::Result<Self> {
        r.read_u32::<LittleEndian>()
    }
}

impl<U: WireKey> RunContainer<U> {
    /// Writes the run count followed by `(start, length - 1)` for each
    /// run, little-endian. Does not validate the interval list — its
    /// invariants hold by construction.
    pub fn write_to<W: Write>(&self, w: &mut W) -> RleResult<()> {
        let n: u16 = self
            .intervals
            .len()
            .try_into()
            .map_err(|_| RleError::PreconditionViolated(format!(
                "{} runs exceeds the u16 run-count field",
                self.intervals.len()
            )))?;
        w.write_u16::<LittleEndian>(n)?;
        for iv in &self.intervals {
            iv.start.write_wire(w)?;
            let length_minus_one = U::from(widen(iv.last) - widen(iv.start)).ok_or_else(|| {
                RleError::PreconditionViolated("run length overflows key width".to_string())
            })?;
            length_minus_one.write_wire(w)?;
        }
        Ok(())
    }

    /// Reads a container back from the layout [`write_to`](Self::write_to)
    /// produces. Verifies that runs are strictly increasing (each run's
    /// `start` is past the previous run's `last`); fails with
    /// [`RleError::MalformedInput`] otherwise. Does not itself reject a
    /// merely-adjacent (non-canonical) run pair — a stream built by
    /// something other than [`write_to`](Self::write_to) could hand back
    /// a container that violates the non-adjacency invariant.
    pub fn read_from<R: Read>(r: &mut R) -> RleResult<Self> {
        let n = r.read_u16::<LittleEndian>()?;
        let mut intervals = Vec::with_capacity(n as usize);
        let mut prev_last: Option<U> = None;

        for _ in 0..n {
            let start = U::read_wire(r)?;
            let length_minus_one = U::read_wire(r)?;
            let last = U::from(widen(start) + widen(length_minus_one)).ok_or_else(|| {
                RleError::MalformedInput("run length overflows key width on read".to_string())
            })?;

            if let Some(pl) = prev_last {
                if widen(pl) >= widen(start) {
                    return Err(RleError::MalformedInput(format!(
                        "runs are not strictly increasing: previous last {pl:?} >= next start {start:?}"
                    )));
                }
            }

            prev_last = Some(last);
            intervals.push(Interval::new(start, last));
        }

        Ok(Self::take_ownership(intervals))
    }

    /// Exact serialized size in bytes for the layout
    /// [`write_to`](Self::write_to) produces.
    pub fn serialized_size(&self) -> usize {
        2 + self.intervals.len() * 2 * U::BYTES
    }
}

#[cfg(feature = "serde")]
pub mod envelope {
    use serde::{Deserialize, Serialize};

    use super::*;

    /// A self-describing, tagged form of a container suitable for whole
    /// -container persistence, independent of the compact wire layout
    /// used by [`super::RunContainer::write_to`].
    #[derive(Serialize, Deserialize)]
    struct Envelope<U> {
        intervals: Vec<(U, U)>,
        cardinality: u64,
    }

    impl<U: WireKey + Serialize + for<'de> Deserialize<'de>> RunContainer<U> {
        pub fn to_envelope_bytes(&self) -> RleResult<Vec<u8>> {
            let envelope = Envelope {
                intervals: self.intervals.iter().map(|iv| (iv.start, iv.last)).collect(),
                cardinality: self.cardinality(),
            };
            bincode::serialize(&envelope)
                .map_err(|e| RleError::MalformedInput(format!("failed to encode envelope: {e}")))
        }

        pub fn from_envelope_bytes(bytes: &[u8]) -> RleResult<Self> {
            let envelope: Envelope<U> = bincode::deserialize(bytes)
                .map_err(|e| RleError::MalformedInput(format!("failed to decode envelope: {e}")))?;
            let intervals = envelope
                .intervals
                .into_iter()
                .map(|(start, last)| Interval::new(start, last))
                .collect();
            Ok(RunContainer::take_ownership(intervals))
        }
    }
}
