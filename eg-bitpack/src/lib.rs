//! Encoder, PEQ builder and single-word bit-parallel Myers kernel (spec §4.1-4.3).
//!
//! This crate has no notion of tiles, batches or streams; it is the pure,
//! sequential building block `eg-engine` drives at scale.

mod encode;
mod kernel;
mod peq;
mod word;

pub use encode::{encode, Matrix, SymbolMap, DEFAULT_ALPHABET};
pub use kernel::edit_distance;
pub use peq::{build_peq, Peq, PeqTable};
pub use word::Word;
