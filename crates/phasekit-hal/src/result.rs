//! Measurement results.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Histogram of measured bitstrings.
///
/// Keys carry one character per classical bit with bit 0 rightmost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` more occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring`, zero if it was never seen.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Outcomes sorted by count descending, then bitstring ascending.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut entries: Vec<_> = self.counts.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The most frequent outcome. Ties go to the lexicographically smallest
    /// bitstring.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.sorted().into_iter().next()
    }

    /// Relative frequency of `bitstring`.
    #[allow(clippy::cast_precision_loss)]
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            return 0.0;
        }
        self.get(bitstring) as f64 / total as f64
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bitstring, count) in iter {
            counts.insert(bitstring, count);
        }
        counts
    }
}

/// Result of executing a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement histogram.
    pub counts: Counts,
    /// Number of shots executed.
    pub shots: u32,
    /// Wall-clock execution time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a new result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}
