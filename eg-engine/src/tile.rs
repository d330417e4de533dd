//! Tile executor: spec §4.4. Processes one `(r0, c0)`-shaped tile by running the
//! Myers kernel for each row in the tile against a small contiguous group of
//! candidate columns, and appending sub-threshold, upper-triangular matches into
//! the owning stream's edge buffer.

use crate::collector::EdgeBuffer;
use eg_bitpack::{edit_distance, Matrix, PeqTable, Word};
use rayon::prelude::*;

/// Candidate columns are processed in groups of this width to amortize loading a
/// row's PEQ table (spec §4.4: "the reference design uses groups of 4").
const COLUMN_GROUP: usize = 4;

/// `peq_table` holds the PEQ rows for the current row-batch, indexed locally
/// (`local_row = global_row - row_batch_start`). `local_r0..local_r0+rt` is the
/// tile's row range within that batch; `c0..c0+ct` is the tile's (global) column
/// range. Matches are appended into `buffer`; no ordering between rows is
/// required (spec §4.4 "Ordering guarantee"), so rows are processed with
/// `rayon`'s data parallelism — the CPU stand-in for "massively parallel worker
/// units" in spec §5.
#[allow(clippy::too_many_arguments)]
pub fn execute_tile<W: Word + Sync>(
    peq_table: &PeqTable<W>,
    row_batch_start: usize,
    local_r0: usize,
    rt: usize,
    matrix: &Matrix,
    c0: usize,
    ct: usize,
    n: usize,
    threshold: i64,
    buffer: &EdgeBuffer,
) {
    let l = matrix.l();

    (local_r0..local_r0 + rt).into_par_iter().for_each(|local_r| {
        let global_r = row_batch_start + local_r;
        if global_r >= n {
            // Bottom-edge padding: this worker's row does not exist (spec §4.4
            // "Padding policy"). The batch/tile sizing used by the scheduler never
            // actually produces this on the CPU path; kept as a defensive gate.
            return;
        }
        let peq = peq_table.get(local_r);

        let mut c = c0;
        while c < c0 + ct {
            let group_end = (c + COLUMN_GROUP).min(c0 + ct);
            for global_c in c..group_end {
                if global_c <= global_r || global_c >= n {
                    // Upper-triangular gate (`c > r`) and right-edge padding filter.
                    continue;
                }
                let candidate = matrix.seq(global_c);
                let score = edit_distance(peq, candidate, l);
                if score < threshold {
                    buffer.append(global_r as u32, global_c as u32);
                }
            }
            c = group_end;
        }
    });
}
