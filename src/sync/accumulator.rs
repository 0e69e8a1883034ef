//! In-memory buffer of fetched records awaiting a flush.

use crate::data::models::TransactionRecord;

/// Records fetched since the last flush, in accumulation order.
///
/// The buffer never flushes itself; the coordinator checks
/// [`Accumulator::should_flush`] at batch boundaries and calls
/// [`Accumulator::take`] to hand the contents to the store.
#[derive(Debug)]
pub struct Accumulator {
    records: Vec<TransactionRecord>,
    threshold: usize,
}

impl Accumulator {
    pub fn new(threshold: usize) -> Self {
        Self {
            records: Vec::with_capacity(threshold),
            threshold,
        }
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = TransactionRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// True once the buffer holds at least `threshold` records.
    pub fn should_flush(&self) -> bool {
        self.records.len() >= self.threshold
    }

    /// Drain the buffer, leaving it empty.
    pub fn take(&mut self) -> Vec<TransactionRecord> {
        std::mem::replace(&mut self.records, Vec::with_capacity(self.threshold))
    }
}
