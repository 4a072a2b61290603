//! Platform - Host Services
//!
//! Everything the monitor needs from its host: when the server started, the
//! collector counters at startup and now, the GC notification source, and an
//! ordered executor for report delivery.

use crate::executor::TaskExecutor;
use crate::source::EventSource;
use crate::stats::{StatisticsMap, StatisticsSource};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Host integration consumed by the GC monitoring commands
pub trait Platform: Send + Sync {
    /// Moment the server entered normal operation
    fn server_start_time(&self) -> DateTime<Utc>;

    /// Collector counters captured at startup, used as the snapshot baseline
    fn startup_gc_statistics(&self) -> StatisticsMap;

    /// Current cumulative collector counters
    fn current_gc_statistics(&self) -> StatisticsMap;

    /// Source of per-collection notifications
    fn event_source(&self) -> Arc<dyn EventSource>;

    /// Ordered executor for report delivery
    fn executor(&self) -> Arc<dyn TaskExecutor>;

    /// Milliseconds since [`Platform::server_start_time`], never negative
    fn uptime_ms(&self) -> i64 {
        (Utc::now() - self.server_start_time())
            .num_milliseconds()
            .max(0)
    }
}

/// Adapter exposing a platform's live counters as a [`StatisticsSource`]
pub struct PlatformStatistics<'a>(pub &'a dyn Platform);

impl StatisticsSource for PlatformStatistics<'_> {
    fn collector_statistics(&self) -> StatisticsMap {
        self.0.current_gc_statistics()
    }
}
