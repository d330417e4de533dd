//! The bit-parallel Myers '99 kernel, specialized to a single word and a 4-ary
//! alphabet. Terminology (PV/MV, the `+`/`-` indicator bit encoding of the DP
//! differentials) follows Myers' original paper, same as the `compute_block`
//! family this is translated from.
//!
//! Given the scores below:
//!
//! ```text
//! A0 - B0
//! |    |
//! A1 - B1
//!   ...
//! AW - BW
//! ```
//!
//! `pv`/`mv` bit-encode the vertical differences along the query (row) sequence:
//! `pv[k] = [A(k+1) - A(k) == 1]`, `mv[k] = [A(k+1) - A(k) == -1]`.
//!
//! The loop body below is branch-free and runs in constant time per position
//! regardless of the actual distance, which is what makes it amenable to SIMD or
//! GPU lane-level parallelism (spec §4.3 rationale) even though this crate only
//! ever runs it scalar, one candidate column at a time.

use crate::peq::Peq;
use crate::word::Word;
use eg_types::{Symbol, PAD};

/// Computes the edit distance between a query (given by its precomputed `peq`
/// table) and a candidate sequence of the same length `l`.
///
/// `l` must satisfy `l <= W::BITS` and `l >= 1`; callers validate this once at
/// encode time rather than per comparison (spec §4.1).
///
/// Candidate symbols equal to or above [`eg_types::ALPHABET_SIZE`] (the padding
/// sentinel) are treated as matching nothing, which keeps the kernel branch-free
/// for padded tile edges without needing a real fifth PEQ row (spec §4.4 "Padding
/// policy").
#[inline]
pub fn edit_distance<W: Word>(peq: &Peq<W>, candidate: &[Symbol], l: usize) -> i64 {
    debug_assert!(l >= 1 && l as u32 <= W::BITS);
    debug_assert_eq!(candidate.len(), l);

    let mut pv = W::ALL_ONES;
    let mut mv = W::ZERO;
    let mut score: i64 = l as i64;
    let high_bit = W::ONE << (l as u32 - 1);

    for &c in candidate {
        let e = if (c as usize) < peq.len() {
            peq[c as usize]
        } else {
            debug_assert_eq!(c, PAD);
            W::ZERO
        };

        let x = e | mv;
        let s = (x & pv).wrapping_add(&pv);
        let d0 = (s ^ pv) | x;
        let hn = pv & d0;
        let hp = mv | !(pv | d0);
        let x2 = (hp << 1) | W::ONE;
        let mv2 = x2 & d0;
        let pv2 = (hn << 1) | !(x2 | d0);

        if !(hp & high_bit).is_zero() {
            score += 1;
        }
        if !(hn & high_bit).is_zero() {
            score -= 1;
        }

        pv = pv2;
        mv = mv2;
    }

    score
}
