//! Public entry point: `compute_neighbors` wires the encoder, PEQ builder,
//! tiled scheduler and adjacency sink together (spec §2, §4).

mod collector;
mod scheduler;
mod tile;

use eg_bitpack::{encode, SymbolMap};
use eg_types::{EgError, EgResult, EngineConfig, NeighborReport};
use scheduler::Scheduler;
use std::sync::atomic::AtomicBool;
use tracing::info;

/// Computes the within-threshold edit-distance neighborhood over `strings`
/// under `map`, using `config` to size batches, tiles and streams. Equal-length
/// input is required; see [`eg_bitpack::encode`] for the exact validation rules
/// (spec §4.1).
///
/// Returns `Err` only for input/configuration errors that abort with no partial
/// output (spec §4.8). Partial-but-valid outcomes (edge-buffer overflow,
/// cancellation) are reported as fields on the returned [`NeighborReport`].
pub fn compute_neighbors(
    strings: &[&[u8]],
    map: &SymbolMap,
    threshold: i64,
    config: EngineConfig,
) -> EgResult<NeighborReport> {
    compute_neighbors_cancelable(strings, map, threshold, config, None)
}

/// As [`compute_neighbors`], but polls `cancel` at batch boundaries and stops
/// early, returning whatever adjacency has been drained so far (spec §5).
pub fn compute_neighbors_cancelable(
    strings: &[&[u8]],
    map: &SymbolMap,
    threshold: i64,
    config: EngineConfig,
    cancel: Option<&AtomicBool>,
) -> EgResult<NeighborReport> {
    if threshold <= 0 {
        return Err(EgError::NonPositiveThreshold(threshold));
    }
    if config.tile_size == 0 {
        return Err(EgError::NonPositiveTileSize(config.tile_size as i64));
    }

    let matrix = encode(strings, map)?;
    let l = matrix.l();
    if l > u64::BITS as usize {
        return Err(EgError::SequenceTooLong {
            length: l,
            word_bits: u64::BITS,
        });
    }

    info!(n = matrix.n(), l, threshold, "compute_neighbors starting");
    let scheduler = Scheduler::new(&matrix, config, threshold);
    let report = scheduler.run(cancel)?;
    info!(
        edges = report.adjacency.iter().map(|n| n.len()).sum::<usize>() / 2,
        overflowed_tiles = report.overflowed_tiles.len(),
        canceled = report.canceled,
        "compute_neighbors finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(report: &NeighborReport) -> Vec<Vec<u32>> {
        let mut rows: Vec<Vec<u32>> = report.adjacency.iter().map(|r| r.to_vec()).collect();
        for row in &mut rows {
            row.sort_unstable();
        }
        rows
    }

    #[test]
    fn tiny_identity_set_has_no_edges_below_threshold_one() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"ACGT", b"TTTT", b"GGGG"];
        let report = compute_neighbors(&strings, &map, 1, EngineConfig::default()).unwrap();
        assert_eq!(sorted(&report), vec![vec![], vec![], vec![]]);
        assert!(!report.has_overflow());
    }

    #[test]
    fn distance_one_neighborhood_is_found_and_symmetric() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"AAAA", b"AAAT", b"TTTT"];
        let report = compute_neighbors(&strings, &map, 2, EngineConfig::default()).unwrap();
        assert_eq!(sorted(&report), vec![vec![1], vec![0], vec![]]);
    }

    #[test]
    fn threshold_boundary_is_strict_less_than() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"AAAA", b"AATT"];
        // Edit distance is exactly 2; threshold=2 must not match, threshold=3 must.
        let at = compute_neighbors(&strings, &map, 2, EngineConfig::default()).unwrap();
        assert_eq!(sorted(&at), vec![vec![], vec![]]);
        let above = compute_neighbors(&strings, &map, 3, EngineConfig::default()).unwrap();
        assert_eq!(sorted(&above), vec![vec![1], vec![0]]);
    }

    #[test]
    fn empty_and_singleton_inputs_short_circuit() {
        let map = SymbolMap::default_dna();
        let empty: Vec<&[u8]> = vec![];
        let report = compute_neighbors(&empty, &map, 1, EngineConfig::default()).unwrap();
        assert!(report.adjacency.is_empty());

        let single: Vec<&[u8]> = vec![b"ACGT"];
        let report = compute_neighbors(&single, &map, 1, EngineConfig::default()).unwrap();
        assert_eq!(report.adjacency.len(), 1);
        assert!(report.adjacency.neighbors(0).is_empty());
    }

    #[test]
    fn result_is_stable_across_tile_sizes() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"ACGTACGT", b"ACGTACGA", b"TTTTTTTT", b"ACGAACGT", b"GGGGGGGG"];
        let small_tiles = EngineConfig::default().with_tile_size(1);
        let big_tiles = EngineConfig::default().with_tile_size(64);
        let a = compute_neighbors(&strings, &map, 2, small_tiles).unwrap();
        let b = compute_neighbors(&strings, &map, 2, big_tiles).unwrap();
        assert_eq!(sorted(&a), sorted(&b));
    }

    #[test]
    fn result_is_stable_across_stream_counts() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"ACGTACGT", b"ACGTACGA", b"TTTTTTTT", b"ACGAACGT", b"GGGGGGGG"];
        let one_stream = EngineConfig::default().with_streams(1);
        let many_streams = EngineConfig::default().with_streams(6);
        let a = compute_neighbors(&strings, &map, 2, one_stream).unwrap();
        let b = compute_neighbors(&strings, &map, 2, many_streams).unwrap();
        assert_eq!(sorted(&a), sorted(&b));
    }

    #[test]
    fn rejects_nonpositive_threshold() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"ACGT", b"ACGT"];
        let err = compute_neighbors(&strings, &map, 0, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EgError::NonPositiveThreshold(0)));
    }

    #[test]
    fn rejects_sequences_longer_than_a_machine_word() {
        let map = SymbolMap::default_dna();
        let long = vec![b'A'; 65];
        let strings: Vec<&[u8]> = vec![&long, &long];
        let err = compute_neighbors(&strings, &map, 1, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EgError::SequenceTooLong { length: 65, .. }));
    }

    #[test]
    fn cancellation_before_any_batch_yields_an_empty_canceled_report() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = vec![b"AAAA", b"AAAA"];
        let cancel = AtomicBool::new(true);
        let report =
            compute_neighbors_cancelable(&strings, &map, 1, EngineConfig::default(), Some(&cancel)).unwrap();
        assert!(report.canceled);
    }

    #[test]
    fn small_edge_buffer_capacity_reports_overflow_not_an_error() {
        let map = SymbolMap::default_dna();
        let strings: Vec<&[u8]> = (0..20).map(|_| b"AAAA".as_slice()).collect::<Vec<_>>();
        let config = EngineConfig::default().with_edge_buffer_capacity(1).with_streams(1);
        let report = compute_neighbors(&strings, &map, 1, config).unwrap();
        assert!(report.has_overflow());
    }
}
