use clap::Parser;

/// Computes the bounded edit-distance neighborhood over a file of equal-length
/// sequences and writes the result as a flat stream of `(i32, i32)` edges.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// One sequence per line, UTF-8/ASCII, trailing whitespace stripped.
    pub input_vectors_file: String,

    /// Written as a flat little-endian `(i32, i32)` edge stream, no header.
    pub output_edges_file: String,

    /// Pairs with Levenshtein distance strictly below this are reported.
    pub threshold: i64,

    /// Total memory budget for resident PEQ + sequence blocks, in GiB.
    pub mem_budget_gb: Option<f64>,

    /// Row/column tile width (spec default: 64).
    #[arg(long)]
    pub tile_size: Option<usize>,

    /// Number of concurrent streams (spec default: 2).
    #[arg(long)]
    pub streams: Option<usize>,

    /// Per-stream edge-buffer capacity, in pairs (spec default: 5_000_000).
    #[arg(long)]
    pub edge_buffer_capacity: Option<usize>,

    /// Alphabet the candidate file's symbols are mapped against (default: ACGT).
    #[arg(long, default_value = "ACGT")]
    pub alphabet: String,

    /// Repeat for more detail (-v, -vv); default is warnings and above.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
