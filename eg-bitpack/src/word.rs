use num_traits::WrappingAdd;
use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

/// The unsigned machine word the Myers kernel bit-packs its state into. `W` (the
/// word width) is `Word::BITS`; the kernel assumes `L <= Word::BITS` and never
/// instantiated for anything else (spec §4.3, §9 "Multi-word Myers for L > W").
///
/// Implemented for `u32` and `u64`: the two machine word widths spec §1 names.
pub trait Word:
    Copy
    + Eq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + WrappingAdd
{
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;
    const ALL_ONES: Self;

    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl Word for u32 {
    const BITS: u32 = u32::BITS;
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const ALL_ONES: Self = u32::MAX;
}

impl Word for u64 {
    const BITS: u32 = u64::BITS;
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const ALL_ONES: Self = u64::MAX;
}
