//! Test Utilities for the gcmon Command Suite
//!
//! Provides a scripted host platform and a fixture that wires the GC
//! monitoring module into a registry with a recording sink.

#![allow(dead_code)]

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use gcmon::event::MemoryUsage;
use gcmon::source::GcListener;
use gcmon::{
    CollectingSink, CollectorStatistics, CommandContext, CommandModule, CommandRegistry,
    EventSource, GcAction, GcEvent, GcEventSource, GcMonitoringModule, Platform, ResponseSink,
    Result, SerialExecutor, StatisticsMap, SubscriptionHandle, TaskExecutor,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Maximum time to wait for the report worker
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default uptime of the scripted server
pub const DEFAULT_UPTIME_MS: i64 = 100_000;

/// ============================================================================
/// SCRIPTED PLATFORM
/// ============================================================================

/// Host whose counters and events are driven by the test
pub struct TestPlatform {
    pub start_time: DateTime<Utc>,
    pub baseline: StatisticsMap,
    pub current: Mutex<StatisticsMap>,
    pub source: Arc<dyn EventSource>,
    pub executor: Arc<SerialExecutor>,
}

impl TestPlatform {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self {
            start_time: Utc::now() - ChronoDuration::milliseconds(DEFAULT_UPTIME_MS),
            baseline: StatisticsMap::new(),
            current: Mutex::new(StatisticsMap::new()),
            source,
            executor: Arc::new(
                SerialExecutor::spawn("gcmon-test-report", None)
                    .expect("report worker should start"),
            ),
        }
    }

    pub fn with_baseline(mut self, baseline: StatisticsMap) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn set_current(&self, current: StatisticsMap) {
        *self.current.lock() = current;
    }
}

impl Platform for TestPlatform {
    fn server_start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn startup_gc_statistics(&self) -> StatisticsMap {
        self.baseline.clone()
    }

    fn current_gc_statistics(&self) -> StatisticsMap {
        self.current.lock().clone()
    }

    fn event_source(&self) -> Arc<dyn EventSource> {
        Arc::clone(&self.source)
    }

    fn executor(&self) -> Arc<dyn TaskExecutor> {
        self.executor.clone()
    }
}

/// Event source wrapper that counts subscription traffic
pub struct CountingEventSource {
    pub inner: GcEventSource,
    pub subscribes: AtomicUsize,
    pub unsubscribes: AtomicUsize,
}

impl CountingEventSource {
    pub fn new() -> Self {
        Self {
            inner: GcEventSource::new(),
            subscribes: AtomicUsize::new(0),
            unsubscribes: AtomicUsize::new(0),
        }
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }
}

impl EventSource for CountingEventSource {
    fn subscribe(&self, listener: GcListener) -> SubscriptionHandle {
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        self.inner.subscribe(listener)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.unsubscribes.fetch_add(1, Ordering::SeqCst);
        self.inner.unsubscribe(handle)
    }
}

/// ============================================================================
/// MONITOR FIXTURE
/// ============================================================================

/// Registry with the GC monitoring module and a recording sink
pub struct MonitorFixture {
    pub host: Arc<TestPlatform>,
    pub platform: Arc<dyn Platform>,
    pub sink: Arc<CollectingSink>,
    pub response: Arc<dyn ResponseSink>,
    pub module: Arc<GcMonitoringModule>,
    pub registry: CommandRegistry,
}

impl MonitorFixture {
    pub fn new(host: TestPlatform) -> Self {
        let host = Arc::new(host);
        let sink = Arc::new(CollectingSink::new());
        let module = Arc::new(GcMonitoringModule::new());

        let mut registry = CommandRegistry::new();
        registry
            .register_module(module.clone())
            .expect("module commands should register");

        Self {
            platform: host.clone(),
            host,
            response: sink.clone(),
            sink,
            module,
            registry,
        }
    }

    /// Fixture over a plain in-process event source
    pub fn with_source(source: Arc<GcEventSource>) -> Self {
        Self::new(TestPlatform::new(source))
    }

    pub fn run(&self, label: &str) -> Result<()> {
        let context = CommandContext {
            platform: &self.platform,
            response: &self.response,
            arguments: &[],
        };
        self.registry.dispatch(label, &context)
    }

    pub fn flush(&self) {
        self.host
            .executor
            .flush(FLUSH_TIMEOUT)
            .expect("report worker should catch up");
    }

    pub fn close(&self) {
        self.module.close();
    }
}

/// ============================================================================
/// DATA BUILDERS
/// ============================================================================

pub fn stats(entries: &[(&str, u64, f64)]) -> StatisticsMap {
    entries
        .iter()
        .map(|(name, count, time)| (name.to_string(), CollectorStatistics::new(*count, *time)))
        .collect()
}

/// Minor collection shrinking Eden from `before` to `after` bytes
pub fn eden_event(id: u64, before: u64, after: u64) -> GcEvent {
    GcEvent::new("G1 Young Generation", GcAction::MinorGc, 4.25)
        .with_id(id)
        .with_cause("G1 Evacuation Pause")
        .with_region("G1 Eden Space", MemoryUsage::used(before), MemoryUsage::used(after))
}
