use num_traits::{NumCast, PrimInt, ToPrimitive, Unsigned};

/// The unsigned integer width `U` a run container can store keys in.
///
/// Bounded to `u16`/`u32` in practice, but expressed as a trait rather
/// than an enum so the container logic is written once and monomorphized
/// per width instead of duplicated per width.
pub trait RunKey: PrimInt + Unsigned + NumCast + ToPrimitive + std::fmt::Debug {
    /// The largest key this width can store, e.g. `u16::MAX`/`u32::MAX`.
    const MAX_KEY: Self;
}

impl RunKey for u16 {
    const MAX_KEY: Self = u16::MAX;
}

impl RunKey for u32 {
    const MAX_KEY: Self = u32::MAX;
}

/// Widen `x` into `u64` so `+1` never overflows, even when `x` is
/// `U::MAX_KEY`. All interval arithmetic that could touch the upper
/// boundary goes through this rather than native-width addition.
#[inline]
pub fn widen<U: RunKey>(x: U) -> u64 {
    x.to_u64().expect("RunKey values always fit in u64")
}

/// Narrow a widened `u64` back into `U`. Panics if `x` does not fit,
/// which would indicate a bug in the caller's arithmetic (e.g. failing
/// to check for overflow past `U::MAX_KEY` before calling this).
#[inline]
pub fn narrow<U: RunKey>(x: u64) -> U {
    U::from(x).expect("value must fit in the run container's key width")
}

/// Like [`narrow`], but returns `None` instead of panicking when `x`
/// overflows `U`'s range. Used where overflow is an expected, checked
/// outcome (e.g. extending an interval past `MAX_KEY`) rather than a bug.
#[inline]
pub fn try_narrow<U: RunKey>(x: u64) -> Option<U> {
    U::from(x)
}
