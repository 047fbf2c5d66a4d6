//! Filter counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome counters, shared by all concurrent invocations of a filter
#[derive(Debug, Default)]
pub struct FilterStats {
    passed_through: AtomicU64,
    compressed: AtomicU64,
    recovered: AtomicU64,
    bytes_in: AtomicU64,
    bytes_out: AtomicU64,
}

impl FilterStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_pass_through(&self) {
        self.passed_through.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_compressed(&self, original_len: usize, compressed_len: usize) {
        self.compressed.fetch_add(1, Ordering::Relaxed);
        self.bytes_in.fetch_add(original_len as u64, Ordering::Relaxed);
        self.bytes_out.fetch_add(compressed_len as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_recovered(&self) {
        self.recovered.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            passed_through: self.passed_through.load(Ordering::Relaxed),
            compressed: self.compressed.load(Ordering::Relaxed),
            recovered: self.recovered.load(Ordering::Relaxed),
            bytes_in: self.bytes_in.load(Ordering::Relaxed),
            bytes_out: self.bytes_out.load(Ordering::Relaxed),
        }
    }
}

/// Copy of [`FilterStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Responses returned untouched because compression did not apply
    pub passed_through: u64,
    /// Responses whose body was replaced
    pub compressed: u64,
    /// Responses returned untouched after a compression failure
    pub recovered: u64,
    /// Body bytes before compression, over compressed responses
    pub bytes_in: u64,
    /// Body bytes after compression, over compressed responses
    pub bytes_out: u64,
}

impl StatsSnapshot {
    /// Bytes removed across all compressed responses
    pub fn bytes_saved(&self) -> u64 {
        self.bytes_in.saturating_sub(self.bytes_out)
    }

    /// Total responses seen
    pub fn total(&self) -> u64 {
        self.passed_through + self.compressed + self.recovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot() {
        let stats = FilterStats::new();
        stats.record_pass_through();
        stats.record_compressed(100, 60);
        stats.record_compressed(50, 50);
        stats.record_recovered();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.passed_through, 1);
        assert_eq!(snapshot.compressed, 2);
        assert_eq!(snapshot.recovered, 1);
        assert_eq!(snapshot.bytes_saved(), 40);
        assert_eq!(snapshot.total(), 4);
    }
}
