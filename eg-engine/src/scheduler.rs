//! Batch scheduler: spec §4.5. Owns the outer row-batch / inner col-batch loop,
//! the upper-triangular tile enumeration, and the fixed pool of concurrent
//! "streams" each tile is dispatched to (spec §5).

use crate::collector::EdgeBuffer;
use crate::tile::execute_tile;
use eg_bitpack::{Matrix, PeqTable};
use eg_types::{AdjList, EgError, EgResult, EngineConfig, NeighborReport, TileCoord, MIN_BATCH};
use itertools::Itertools;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};

/// One PEQ row (4 `u64` words) plus the matching byte of the transposed sequence
/// column is what a resident row actually costs; see spec §4.5.
fn bytes_per_row(l: usize) -> usize {
    4 * std::mem::size_of::<u64>() + l
}

/// Computes `B`, the row-batch size, per spec §4.5: `floor((mem_limit - reserve)
/// / bytes_per_row)`, rounded down to a multiple of the tile size, clamped to
/// `[min(MIN_BATCH, n), n]`.
fn batch_size(config: &EngineConfig, l: usize, n: usize) -> EgResult<usize> {
    let bpr = bytes_per_row(l).max(1);
    let usable = config.mem_budget_bytes.saturating_sub(config.reserve_bytes);
    let raw = usable / bpr;
    let tile = config.tile_size.max(1);
    let aligned = (raw / tile) * tile;

    let effective_min = MIN_BATCH.min(n);
    if aligned < effective_min {
        return Err(EgError::OutOfMemory {
            mem_budget_bytes: config.mem_budget_bytes,
            reserve: config.reserve_bytes,
            bytes_per_row: bpr,
            min_batch: MIN_BATCH,
        });
    }
    Ok(aligned.min(n))
}

/// One tile's coordinates and shape: `(r0, rt, c0, ct)`.
type TileJob = (usize, usize, usize, usize);

/// Enumerates the strictly-upper-triangular tiles covering `[rb, rb+rt_batch) x
/// [cb, cb+ct_batch)`, at `tile` granularity (spec §4.5 "Tile loop").
fn enumerate_tiles(rb: usize, rt_batch: usize, cb: usize, ct_batch: usize, tile: usize) -> Vec<TileJob> {
    (rb..rb + rt_batch)
        .step_by(tile)
        .cartesian_product((cb..cb + ct_batch).step_by(tile))
        .filter(|&(tr, tc)| tc >= tr)
        .map(|(tr, tc)| {
            let rt = tile.min(rb + rt_batch - tr);
            let ct = tile.min(cb + ct_batch - tc);
            (tr, rt, tc, ct)
        })
        .collect()
}

pub struct Scheduler<'a> {
    matrix: &'a Matrix,
    config: EngineConfig,
    threshold: i64,
}

impl<'a> Scheduler<'a> {
    pub fn new(matrix: &'a Matrix, config: EngineConfig, threshold: i64) -> Self {
        Self {
            matrix,
            config,
            threshold,
        }
    }

    /// Runs the full N x N upper-triangular sweep and returns the adjacency list.
    /// `cancel`, if set, is polled at every row-batch and col-batch boundary
    /// (spec §5 "Cancellation is cooperative at batch boundaries").
    pub fn run(&self, cancel: Option<&AtomicBool>) -> EgResult<NeighborReport> {
        let n = self.matrix.n();
        let l = self.matrix.l();

        if n < 2 {
            return Ok(NeighborReport {
                adjacency: AdjList::new(n),
                overflowed_tiles: Vec::new(),
                canceled: false,
            });
        }

        let rb_size = batch_size(&self.config, l, n)?;
        let streams = self.config.streams.max(1);
        let buffers: Vec<EdgeBuffer> = (0..streams)
            .map(|_| EdgeBuffer::new(self.config.edge_buffer_capacity))
            .collect();

        let adjacency = Mutex::new(AdjList::new(n));
        let overflowed = Mutex::new(Vec::new());
        let mut canceled = false;

        let mut rb = 0;
        'outer: while rb < n {
            if cancel.map_or(false, |c| c.load(Ordering::Relaxed)) {
                canceled = true;
                break 'outer;
            }

            let rt_batch = rb_size.min(n - rb);
            let rows: Vec<_> = (rb..rb + rt_batch).map(|s| self.matrix.seq(s)).collect();
            let peq_table = PeqTable::<u64>::build(&rows);
            info!(row_batch_start = rb, row_batch_len = rt_batch, "row-batch PEQ block built");

            let mut cb = rb;
            while cb < n {
                if cancel.map_or(false, |c| c.load(Ordering::Relaxed)) {
                    canceled = true;
                    break 'outer;
                }

                let ct_batch = rb_size.min(n - cb);
                let tiles = enumerate_tiles(rb, rt_batch, cb, ct_batch, self.config.tile_size.max(1));

                std::thread::scope(|scope| {
                    for stream_id in 0..streams {
                        let tiles = &tiles;
                        let buffer = &buffers[stream_id];
                        let peq_table = &peq_table;
                        let matrix = self.matrix;
                        let adjacency = &adjacency;
                        let overflowed = &overflowed;
                        let threshold = self.threshold;
                        let rb = rb;

                        scope.spawn(move || {
                            // Within-stream FIFO: this worker owns `buffer` and
                            // processes its assigned tiles strictly in order
                            // (spec §5 "Within a stream" happens-before chain).
                            for &(tr, rt, tc, ct) in tiles.iter().skip(stream_id).step_by(streams) {
                                buffer.reset();
                                execute_tile(peq_table, rb, tr - rb, rt, matrix, tc, ct, n, threshold, buffer);
                                let drained = buffer.drain();
                                if drained.overflowed {
                                    warn!(
                                        tile_r0 = tr,
                                        tile_c0 = tc,
                                        capacity = buffer.capacity_hint(),
                                        "edge buffer overflow: adjacency for this tile is a subset of the true neighborhood"
                                    );
                                    overflowed.lock().unwrap().push(TileCoord { r0: tr, c0: tc });
                                }
                                let mut adj = adjacency.lock().unwrap();
                                for (i, j) in drained.edges {
                                    adj.push_edge(i, j);
                                }
                            }
                        });
                    }
                });

                info!(col_batch_start = cb, col_batch_len = ct_batch, "col-batch drained");
                cb += ct_batch;
            }
            rb += rt_batch;
        }

        Ok(NeighborReport {
            adjacency: adjacency.into_inner().unwrap(),
            overflowed_tiles: overflowed.into_inner().unwrap(),
            canceled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_tiles_is_strictly_upper_triangular() {
        let tiles = enumerate_tiles(0, 10, 0, 10, 4);
        for (tr, _rt, tc, _ct) in &tiles {
            assert!(tc >= tr, "tile ({tr},{tc}) is below the diagonal");
        }
    }

    #[test]
    fn enumerate_tiles_covers_the_whole_range_once() {
        let tiles = enumerate_tiles(0, 8, 0, 8, 3);
        let mut covered = vec![vec![false; 8]; 8];
        for (tr, rt, tc, ct) in tiles {
            for r in tr..tr + rt {
                for c in tc..tc + ct {
                    if c > r {
                        assert!(!covered[r][c], "({r},{c}) covered twice");
                        covered[r][c] = true;
                    }
                }
            }
        }
        for r in 0..8 {
            for c in 0..8 {
                if c > r {
                    assert!(covered[r][c], "({r},{c}) never covered");
                }
            }
        }
    }

    #[test]
    fn batch_size_rejects_insufficient_budget() {
        let config = EngineConfig::default()
            .with_mem_budget_bytes(1024)
            .with_tile_size(64);
        let err = batch_size(&config, 64, 100_000).unwrap_err();
        assert!(matches!(err, EgError::OutOfMemory { .. }));
    }

    #[test]
    fn batch_size_clamps_to_n_when_n_is_small() {
        let config = EngineConfig::default();
        let b = batch_size(&config, 32, 10).unwrap();
        assert_eq!(b, 10);
    }
}
