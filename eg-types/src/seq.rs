/// A single symbol of the four-letter working alphabet, always in `0..4`.
///
/// The encoder is the only place a value outside this range may appear, and then only
/// as the padding sentinel (see [`PAD`]).
pub type Symbol = u8;

/// Sentinel written into padding columns at the right/bottom edge of a tile.
///
/// Any value `>= ALPHABET_SIZE` works as a sentinel; the kernel never indexes a PEQ
/// table with it directly (see `eg_bitpack::kernel`), so the exact value is cosmetic.
pub const PAD: Symbol = 99;

/// Size of the working alphabet. Hard-coded: the PEQ table is a fixed `[W; ALPHABET_SIZE]`
/// array, not a `Vec`, so this is a compile-time constant rather than a config field.
pub const ALPHABET_SIZE: usize = 4;

/// A borrowed, already-encoded sequence of `Symbol`s.
pub type EncodedSeq<'a> = &'a [Symbol];

/// 0-based index of a sequence in the caller's input order.
pub type SeqId = u32;
