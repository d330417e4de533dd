//! Shared types for the bounded edit-distance neighbor engine: the symbol/sequence
//! aliases, the adjacency data model, run configuration, and the error taxonomy.
//! No algorithm lives here; see `eg-bitpack` and `eg-engine`.

mod adjacency;
mod config;
mod error;
mod seq;

pub use adjacency::{AdjList, NeighborReport, TileCoord};
pub use config::{
    EngineConfig, DEFAULT_EDGE_BUFFER_CAPACITY, DEFAULT_RESERVE_BYTES, DEFAULT_STREAMS,
    DEFAULT_TILE_SIZE, MIN_BATCH,
};
pub use error::{EgError, EgResult};
pub use seq::{EncodedSeq, SeqId, Symbol, ALPHABET_SIZE, PAD};
