mod cli;
mod io;

use clap::Parser;
use cli::Cli;
use eg_bitpack::SymbolMap;
use eg_engine::compute_neighbors;
use eg_types::{EgError, EngineConfig};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit codes for the categories of spec §7: `bad_input`, `oom`, `stream_error`,
/// and I/O failure each map to a distinct non-zero code so a caller scripting
/// this binary can branch without parsing stderr.
fn exit_code_for(err: &EgError) -> u8 {
    match err {
        EgError::LengthMismatch { .. }
        | EgError::UnmappedSymbol { .. }
        | EgError::SequenceTooLong { .. }
        | EgError::NonPositiveThreshold(_)
        | EgError::NonPositiveTileSize(_) => 2,
        EgError::OutOfMemory { .. } => 3,
        EgError::StreamError { .. } => 4,
        EgError::Io { .. } => 5,
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), EgError> {
    info!(input = %cli.input_vectors_file, "reading candidate file");
    let lines = io::read_candidates(&cli.input_vectors_file)?;
    let strings: Vec<&[u8]> = lines.iter().map(|s| s.as_bytes()).collect();

    let mut config = EngineConfig::default();
    if let Some(gb) = cli.mem_budget_gb {
        config = config.with_mem_budget_bytes((gb * 1024.0 * 1024.0 * 1024.0) as usize);
    }
    if let Some(tile_size) = cli.tile_size {
        config = config.with_tile_size(tile_size);
    }
    if let Some(streams) = cli.streams {
        config = config.with_streams(streams);
    }
    if let Some(capacity) = cli.edge_buffer_capacity {
        config = config.with_edge_buffer_capacity(capacity);
    }

    let map = SymbolMap::new(cli.alphabet.as_bytes());
    let report = compute_neighbors(&strings, &map, cli.threshold, config)?;

    if report.has_overflow() {
        tracing::warn!(
            tiles = report.overflowed_tiles.len(),
            "one or more tiles overflowed their edge buffer; adjacency is a subset of the true neighborhood"
        );
    }

    let mut edges = Vec::new();
    for (i, neighbors) in report.adjacency.iter().enumerate() {
        for &j in neighbors {
            if (j as usize) > i {
                edges.push((i as u32, j));
            }
        }
    }
    io::write_edges(&cli.output_edges_file, &edges)?;
    info!(edges = edges.len(), output = %cli.output_edges_file, "done");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "compute_neighbors failed");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
