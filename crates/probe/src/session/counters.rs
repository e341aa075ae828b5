//! Per-address misprediction counters.

use std::collections::HashMap;

use crate::common::InstAddr;

/// Cumulative misprediction count per instruction address.
///
/// Counts only grow. Reading an address that was never recorded yields 0
/// and does not create an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MispredictCounters {
    counts: HashMap<InstAddr, u64>,
}

impl MispredictCounters {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one misprediction at `addr` and returns the new count.
    pub fn record(&mut self, addr: InstAddr) -> u64 {
        let count = self.counts.entry(addr).or_insert(0);
        *count += 1;
        *count
    }

    /// Current count for `addr`, or 0 if none was recorded.
    pub fn ordinal(&self, addr: InstAddr) -> u64 {
        self.counts.get(&addr).copied().unwrap_or(0)
    }

    /// Number of distinct addresses recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// All addresses, most mispredicted first; ties ordered by address.
    pub fn hottest(&self) -> Vec<(InstAddr, u64)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(&a, &n)| (a, n)).collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }
}
