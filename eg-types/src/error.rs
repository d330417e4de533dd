use thiserror::Error;

/// Error taxonomy for the neighbor engine.
///
/// `EdgeBufferOverflow` and cancellation are deliberately **not** variants here: both
/// still produce a usable (if partial) adjacency list, so they are reported as fields
/// on [`crate::NeighborReport`] rather than as an `Err`. Everything in this enum aborts
/// the call with no partial output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EgError {
    #[error("sequence {index} has length {actual}, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("sequence {index} contains symbol {symbol} outside the alphabet at position {position}")]
    UnmappedSymbol {
        index: usize,
        position: usize,
        symbol: u8,
    },

    #[error("sequence length {length} exceeds the machine word width {word_bits}")]
    SequenceTooLong { length: usize, word_bits: u32 },

    #[error("threshold must be positive, got {0}")]
    NonPositiveThreshold(i64),

    #[error("tile size must be positive, got {0}")]
    NonPositiveTileSize(i64),

    #[error("memory budget of {mem_budget_bytes} bytes leaves no room for a batch of at least {min_batch} rows ({bytes_per_row} bytes/row, {reserve} bytes reserved)")]
    OutOfMemory {
        mem_budget_bytes: usize,
        reserve: usize,
        bytes_per_row: usize,
        min_batch: usize,
    },

    #[error("stream {stream} failed: {reason}")]
    StreamError { stream: usize, reason: String },

    #[error("failed to read candidate file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::sync::Arc<std::io::Error>,
    },
}

pub type EgResult<T> = Result<T, EgError>;
