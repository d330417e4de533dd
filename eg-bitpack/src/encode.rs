//! Encoder: spec §4.1. Packs caller strings into a column-major `L x N` byte
//! matrix of symbols in `0..4`. "Column-major" here means each sequence occupies
//! a contiguous run of `L` bytes, which is exactly the access pattern the PEQ
//! builder and kernel want (iterate one whole sequence at a time).

use bio::alphabets::{Alphabet, RankTransform};
use eg_types::{EgError, EgResult, EncodedSeq, Symbol};

/// The four DNA bases, in the order used by the reference CLI default mapping.
/// Any 4-symbol mapping works; callers needing a different alphabet should build
/// their own [`SymbolMap`].
pub const DEFAULT_ALPHABET: &[u8] = b"ACGT";

/// Maps caller bytes to `0..4` symbols, rejecting anything outside the mapping.
pub struct SymbolMap {
    transform: RankTransform,
}

impl SymbolMap {
    pub fn new(alphabet: &[u8]) -> Self {
        Self {
            transform: RankTransform::new(&Alphabet::new(alphabet)),
        }
    }

    pub fn default_dna() -> Self {
        Self::new(DEFAULT_ALPHABET)
    }

    /// `None` if `c` is not in the mapped alphabet.
    fn map(&self, c: u8) -> Option<Symbol> {
        self.transform.ranks.get(&c).map(|&r| r as Symbol)
    }
}

/// Column-major `L x N` matrix of encoded symbols: sequence `s` is the contiguous
/// slice `data[s*l .. (s+1)*l]`.
pub struct Matrix {
    data: Vec<Symbol>,
    l: usize,
    n: usize,
}

impl Matrix {
    pub fn l(&self) -> usize {
        self.l
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn seq(&self, s: usize) -> EncodedSeq {
        &self.data[s * self.l..(s + 1) * self.l]
    }

    pub fn seqs(&self) -> impl Iterator<Item = EncodedSeq> {
        (0..self.n).map(move |s| self.seq(s))
    }
}

/// Encodes `strings` under `map`. Rejects the whole batch (no partial output) if
/// any string has the wrong length or an unmapped symbol (spec §4.1).
pub fn encode(strings: &[&[u8]], map: &SymbolMap) -> EgResult<Matrix> {
    let n = strings.len();
    let l = strings.first().map_or(0, |s| s.len());

    let mut data = vec![0 as Symbol; l * n];
    for (s, string) in strings.iter().enumerate() {
        if string.len() != l {
            return Err(EgError::LengthMismatch {
                index: s,
                expected: l,
                actual: string.len(),
            });
        }
        for (k, &c) in string.iter().enumerate() {
            let symbol = map.map(c).ok_or(EgError::UnmappedSymbol {
                index: s,
                position: k,
                symbol: c,
            })?;
            data[s * l + k] = symbol;
        }
    }

    Ok(Matrix { data, l, n })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_equal_length_strings_column_major() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"ACGT", b"TTTT"];
        let m = encode(&strings, &map).unwrap();
        assert_eq!(m.l(), 4);
        assert_eq!(m.n(), 2);
        assert_eq!(m.seq(0), &[0, 1, 2, 3]);
        assert_eq!(m.seq(1), &[3, 3, 3, 3]);
    }

    #[test]
    fn empty_input_encodes_to_empty_matrix() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![];
        let m = encode(&strings, &map).unwrap();
        assert_eq!(m.n(), 0);
        assert_eq!(m.l(), 0);
    }

    #[test]
    fn rejects_length_mismatch_with_no_partial_output() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"ACGT", b"AC"];
        let err = encode(&strings, &map).unwrap_err();
        assert_eq!(
            err,
            EgError::LengthMismatch {
                index: 1,
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_unmapped_symbol() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"ACGN"];
        let err = encode(&strings, &map).unwrap_err();
        assert_eq!(
            err,
            EgError::UnmappedSymbol {
                index: 0,
                position: 3,
                symbol: b'N'
            }
        );
    }
}
