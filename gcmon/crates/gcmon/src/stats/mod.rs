//! Stats Module - Collector Statistics
//!
//! Cumulative per-collector counters as reported by the host runtime, and
//! the baseline subtraction that turns them into "since startup" figures.
//!
//! Metrics:
//! - Collection count (monotonic)
//! - Total collection time in milliseconds (monotonic)

pub mod snapshot;

pub use snapshot::{render_snapshot, summarize, CollectorSummary};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Cumulative statistics for one named collector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectorStatistics {
    /// Number of collections performed
    pub collection_count: u64,
    /// Total time spent collecting (ms)
    pub collection_time_ms: f64,
}

impl CollectorStatistics {
    pub fn new(collection_count: u64, collection_time_ms: f64) -> Self {
        Self {
            collection_count,
            collection_time_ms,
        }
    }

    /// Subtract an earlier reading of the same collector
    ///
    /// Host counters only grow, so a baseline taken earlier never exceeds the
    /// current value; results are clamped at zero regardless.
    pub fn subtract(&self, baseline: &CollectorStatistics) -> CollectorStatistics {
        CollectorStatistics {
            collection_count: self
                .collection_count
                .saturating_sub(baseline.collection_count),
            collection_time_ms: (self.collection_time_ms - baseline.collection_time_ms).max(0.0),
        }
    }

    /// Average time per collection (ms), `None` when nothing was collected
    pub fn average_collection_time_ms(&self) -> Option<f64> {
        if self.collection_count == 0 {
            return None;
        }
        Some(self.collection_time_ms / self.collection_count as f64)
    }

    /// Average gap between collections (ms) over `uptime_ms`
    ///
    /// Time spent collecting is not counted as part of the gap.
    pub fn average_frequency_ms(&self, uptime_ms: f64) -> Option<f64> {
        if self.collection_count == 0 {
            return None;
        }
        Some((uptime_ms - self.collection_time_ms) / self.collection_count as f64)
    }
}

/// Collector name to statistics, in the order the host reports collectors
pub type StatisticsMap = IndexMap<String, CollectorStatistics>;

/// Read access to the host's cumulative collector counters
pub trait StatisticsSource: Send + Sync {
    /// Current cumulative counters, one entry per collector
    fn collector_statistics(&self) -> StatisticsMap;
}

/// Subtract `baseline` from `current`, keyed by collector name
///
/// Every collector in `current` is kept, including those with no new
/// collections. Collectors that only appear in `baseline` are dropped.
pub fn subtract_baseline(current: &StatisticsMap, baseline: &StatisticsMap) -> StatisticsMap {
    current
        .iter()
        .map(|(name, stats)| {
            let delta = match baseline.get(name) {
                Some(initial) => stats.subtract(initial),
                None => *stats,
            };
            (name.clone(), delta)
        })
        .collect()
}

/// Read current counters from `source` and subtract `baseline`
pub fn poll_subtract_baseline(
    source: &dyn StatisticsSource,
    baseline: &StatisticsMap,
) -> StatisticsMap {
    subtract_baseline(&source.collector_statistics(), baseline)
}
