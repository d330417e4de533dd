/// Reference default for a stream's edge-buffer capacity: 5*10^6 pairs, ~40MB/stream
/// at 8 bytes/pair (two `i32`s). See spec §4.6.
pub const DEFAULT_EDGE_BUFFER_CAPACITY: usize = 5_000_000;

/// Reference default number of concurrent streams (spec §5).
pub const DEFAULT_STREAMS: usize = 2;

/// Reference default tile/batch alignment width (spec §4.5).
pub const DEFAULT_TILE_SIZE: usize = 64;

/// Smallest row-batch the scheduler will ever settle on; below this, budgeting is
/// treated as `oom` rather than silently shrinking further (spec §7).
pub const MIN_BATCH: usize = 64;

/// Bytes of the memory budget held back for bookkeeping (adjacency growth, stream
/// staging buffers) before computing the row-batch size.
pub const DEFAULT_RESERVE_BYTES: usize = 16 * 1024 * 1024;

/// Tunables for one `compute_neighbors` call. All fields have documented defaults;
/// everything here is plain configuration by argument, never global state (spec §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Native tile width/height in rows/columns. Also the alignment unit batch sizes
    /// are rounded down to.
    pub tile_size: usize,
    /// Total memory budget for resident PEQ + sequence blocks, in bytes.
    pub mem_budget_bytes: usize,
    /// Bytes of `mem_budget_bytes` held back before computing the batch size.
    pub reserve_bytes: usize,
    /// Number of concurrent "streams" (worker-pool tasks).
    pub streams: usize,
    /// Per-stream edge-buffer capacity, in pairs.
    pub edge_buffer_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            mem_budget_bytes: 1024 * 1024 * 1024,
            reserve_bytes: DEFAULT_RESERVE_BYTES,
            streams: DEFAULT_STREAMS,
            edge_buffer_capacity: DEFAULT_EDGE_BUFFER_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_mem_budget_bytes(mut self, mem_budget_bytes: usize) -> Self {
        self.mem_budget_bytes = mem_budget_bytes;
        self
    }

    pub fn with_streams(mut self, streams: usize) -> Self {
        self.streams = streams.max(1);
        self
    }

    pub fn with_edge_buffer_capacity(mut self, capacity: usize) -> Self {
        self.edge_buffer_capacity = capacity;
        self
    }
}
