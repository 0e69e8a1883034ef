//! Batch coordination: load reference sets, fan out fetches, flush to the store.

mod accumulator;
mod coordinator;

pub use accumulator::Accumulator;
pub use coordinator::{BatchOutcome, Synchronizer};

/// Players per batch when `--batch-size` isn't given.
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// In-flight fetch ceiling.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;
/// Accumulated record count that triggers a flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 100;

/// Tuning knobs for a run. All values must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub batch_size: usize,
    pub max_concurrent: usize,
    pub flush_threshold: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub players_valid: usize,
    pub players_processed: usize,
    pub failed_fetches: usize,
    pub records_fetched: usize,
    /// Records handed to the store, before in-flush duplicates are merged.
    pub records_flushed: usize,
    /// Rows the store reports as inserted or updated.
    pub rows_written: u64,
    pub flushes: usize,
}
