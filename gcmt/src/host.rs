//! Simulated host runtime.
//!
//! Stands in for a managed runtime so the monitor commands can run from a
//! terminal. The host keeps a two-collector heap model, accumulates collector
//! counters, and, once started, emits one collection per interval from its
//! own notification thread.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossbeam::channel::{self, RecvTimeoutError, Sender};
use gcmon::event::MemoryUsage;
use gcmon::{
    CollectorStatistics, DetachedEventSource, EventSource, GcAction, GcEvent, GcEventSource,
    MonitorConfig, Platform, SerialExecutor, StatisticsMap, TaskExecutor,
};
use gcmon_util::format_bytes;
use parking_lot::Mutex;
use rand::prelude::*;

use crate::config::HostConfig;
use crate::error::{GcmtError, Result};

/// Collections that happen before the server counts as started.
pub const STARTUP_COLLECTIONS: usize = 3;

pub const EDEN_SPACE: &str = "G1 Eden Space";
pub const SURVIVOR_SPACE: &str = "G1 Survivor Space";
pub const OLD_GEN: &str = "G1 Old Gen";
pub const METASPACE: &str = "Metaspace";

const MB: u64 = 1024 * 1024;
const EDEN_CAPACITY: u64 = 256 * MB;
const SURVIVOR_CAPACITY: u64 = 32 * MB;
const OLD_CAPACITY: u64 = 1024 * MB;
const METASPACE_COMMITTED: u64 = 128 * MB;

const NOTIFICATION_THREAD: &str = "gcmt-gc-notify";

/// Region occupancy in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Heap {
    eden: u64,
    survivor: u64,
    old: u64,
    metaspace: u64,
}

impl Heap {
    fn usage(&self) -> [(&'static str, MemoryUsage); 4] {
        [
            (EDEN_SPACE, region(self.eden, EDEN_CAPACITY, Some(EDEN_CAPACITY))),
            (
                SURVIVOR_SPACE,
                region(self.survivor, SURVIVOR_CAPACITY, Some(SURVIVOR_CAPACITY)),
            ),
            (OLD_GEN, region(self.old, OLD_CAPACITY, Some(OLD_CAPACITY))),
            (METASPACE, region(self.metaspace, METASPACE_COMMITTED, None)),
        ]
    }
}

fn region(used: u64, committed: u64, max: Option<u64>) -> MemoryUsage {
    MemoryUsage {
        init: 0,
        used,
        committed,
        max,
    }
}

/// Mutable state of the simulated runtime.
struct Workload {
    rng: StdRng,
    heap: Heap,
    stats: StatisticsMap,
    next_id: u64,
    young_collector: String,
    old_collector: String,
    major_ratio: f64,
}

impl Workload {
    fn new(config: &HostConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut stats = StatisticsMap::new();
        stats.insert(config.young_collector.clone(), CollectorStatistics::default());
        stats.insert(config.old_collector.clone(), CollectorStatistics::default());

        Self {
            rng,
            heap: Heap {
                eden: 0,
                survivor: 0,
                old: 48 * MB,
                metaspace: 24 * MB,
            },
            stats,
            next_id: 1,
            young_collector: config.young_collector.clone(),
            old_collector: config.old_collector.clone(),
            major_ratio: config.major_ratio,
        }
    }

    /// Let the application allocate, then run one collection.
    fn collect(&mut self) -> GcEvent {
        self.heap.eden = self.rng.gen_range(EDEN_CAPACITY / 4..=EDEN_CAPACITY);
        if self.rng.gen_bool(0.2) {
            self.heap.metaspace = (self.heap.metaspace + self.rng.gen_range(0..=512 * 1024))
                .min(METASPACE_COMMITTED);
        }
        let before = self.heap;

        let major = self.rng.gen_bool(self.major_ratio);
        let (collector, action, cause, duration_ms) = if major {
            self.heap.old = (self.heap.old as f64 * self.rng.gen_range(0.3..0.7)) as u64;
            self.heap.survivor = 0;
            (
                self.old_collector.clone(),
                GcAction::MajorGc,
                "G1 Compaction Pause",
                self.rng.gen_range(20.0..200.0),
            )
        } else {
            let promoted = self.heap.survivor / 2;
            self.heap.old = (self.heap.old + promoted).min(OLD_CAPACITY);
            self.heap.survivor = (before.eden / self.rng.gen_range(8..=20)).min(SURVIVOR_CAPACITY);
            (
                self.young_collector.clone(),
                GcAction::MinorGc,
                "G1 Evacuation Pause",
                self.rng.gen_range(1.0..15.0),
            )
        };
        self.heap.eden = 0;

        // Pause times carry two decimals.
        let duration_ms = (duration_ms * 100.0_f64).round() / 100.0;
        let stats = self.stats.entry(collector.clone()).or_default();
        stats.collection_count += 1;
        stats.collection_time_ms += duration_ms;

        let id = self.next_id;
        self.next_id += 1;

        let mut event = GcEvent::new(collector, action, duration_ms)
            .with_id(id)
            .with_cause(cause);
        let regions = before.usage().into_iter().zip(self.heap.usage());
        for ((name, used_before), (_, used_after)) in regions {
            event = event.with_region(name, used_before, used_after);
        }
        event
    }
}

/// Run one collection and hand it to the listeners.
fn step(workload: &Mutex<Workload>, publisher: &GcEventSource) -> GcEvent {
    let event = workload.lock().collect();
    let freed: u64 = event
        .memory_before
        .iter()
        .filter_map(|(name, before)| {
            let after = event.memory_after.get(name)?;
            before.used.checked_sub(after.used)
        })
        .sum();
    tracing::debug!(
        "simulated {} #{} ({} ms, {} freed)",
        event.collector_name,
        event.id,
        event.duration_ms,
        format_bytes(freed)
    );
    publisher.publish(&event);
    event
}

/// Notification thread emitting collections until stopped.
struct Driver {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// A runtime that produces GC activity on demand.
pub struct SimulatedHost {
    interval: Duration,
    start_time: DateTime<Utc>,
    startup: StatisticsMap,
    workload: Arc<Mutex<Workload>>,
    publisher: Arc<GcEventSource>,
    source: Arc<dyn EventSource>,
    executor: Arc<SerialExecutor>,
    driver: Mutex<Option<Driver>>,
}

impl SimulatedHost {
    /// Boot the host.
    ///
    /// A few collections run before the startup counters are captured, as a
    /// real runtime collects while the server is still loading.
    pub fn new(config: &HostConfig, monitor: &MonitorConfig) -> Result<Self> {
        config.validate()?;

        let publisher = Arc::new(GcEventSource::new());
        let mut workload = Workload::new(config);
        for _ in 0..STARTUP_COLLECTIONS {
            workload.collect();
        }
        let startup = workload.stats.clone();

        let source: Arc<dyn EventSource> = if config.notifications {
            publisher.clone()
        } else {
            tracing::info!("host notifications disabled; gcmonitor will stay silent");
            Arc::new(DetachedEventSource::new())
        };

        Ok(Self {
            interval: Duration::from_millis(config.interval_ms),
            start_time: Utc::now(),
            startup,
            workload: Arc::new(Mutex::new(workload)),
            publisher,
            source,
            executor: Arc::new(SerialExecutor::from_config(monitor)?),
            driver: Mutex::new(None),
        })
    }

    /// Run a single collection immediately on the calling thread.
    pub fn collect_now(&self) -> GcEvent {
        step(&self.workload, &self.publisher)
    }

    /// Start the notification thread; a running driver is left alone.
    pub fn start(&self) -> Result<()> {
        let mut driver = self.driver.lock();
        if driver.is_some() {
            return Ok(());
        }

        let (stop, stopped) = channel::bounded::<()>(1);
        let workload = Arc::clone(&self.workload);
        let publisher = Arc::clone(&self.publisher);
        let interval = self.interval;

        let handle = std::thread::Builder::new()
            .name(NOTIFICATION_THREAD.to_string())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        step(&workload, &publisher);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        tracing::debug!("host driver started ({:?} interval)", interval);
        *driver = Some(Driver { stop, handle });
        Ok(())
    }

    /// Stop and join the notification thread.
    pub fn stop(&self) {
        let driver = self.driver.lock().take();
        if let Some(Driver { stop, handle }) = driver {
            drop(stop);
            if handle.join().is_err() {
                tracing::error!("host driver terminated abnormally");
            }
            tracing::debug!("host driver stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.driver.lock().is_some()
    }

    /// Drive collections for `duration`, then stop.
    pub fn run_for(&self, duration: Duration) -> Result<()> {
        if duration.is_zero() {
            return Ok(());
        }
        self.start()?;
        std::thread::sleep(duration);
        self.stop();
        Ok(())
    }

    /// Wait for every queued report.
    pub fn flush(&self, timeout: Duration) -> Result<()> {
        self.executor.flush(timeout).map_err(GcmtError::from)
    }

    /// Stop the driver, detach listeners, and drain the report worker.
    pub fn shutdown(&self) {
        self.stop();
        self.publisher.close();
        self.executor.shutdown();
    }
}

impl Platform for SimulatedHost {
    fn server_start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn startup_gc_statistics(&self) -> StatisticsMap {
        self.startup.clone()
    }

    fn current_gc_statistics(&self) -> StatisticsMap {
        self.workload.lock().stats.clone()
    }

    fn event_source(&self) -> Arc<dyn EventSource> {
        Arc::clone(&self.source)
    }

    fn executor(&self) -> Arc<dyn TaskExecutor> {
        self.executor.clone()
    }
}

impl Drop for SimulatedHost {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcmon::stats::subtract_baseline;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn seeded(seed: u64) -> HostConfig {
        HostConfig {
            interval_ms: 5,
            seed: Some(seed),
            ..Default::default()
        }
    }

    fn host(config: &HostConfig) -> SimulatedHost {
        SimulatedHost::new(config, &MonitorConfig::default()).unwrap()
    }

    #[test]
    fn test_startup_collections_are_in_baseline() {
        let host = host(&seeded(1));

        let startup = host.startup_gc_statistics();
        let total: u64 = startup.values().map(|s| s.collection_count).sum();
        assert_eq!(total, STARTUP_COLLECTIONS as u64);

        let since_start = subtract_baseline(&host.current_gc_statistics(), &startup);
        assert!(since_start.values().all(|s| s.collection_count == 0));
        assert_eq!(since_start.len(), 2);
    }

    #[test]
    fn test_same_seed_same_workload() {
        let first = host(&seeded(42));
        let second = host(&seeded(42));

        for _ in 0..10 {
            assert_eq!(first.collect_now(), second.collect_now());
        }
    }

    #[test]
    fn test_collect_updates_counters() {
        let host = host(&seeded(3));
        let event = host.collect_now();

        let current = host.current_gc_statistics();
        let collected = &current[event.collector_name.as_str()];
        let baseline = &host.startup_gc_statistics()[event.collector_name.as_str()];
        assert_eq!(collected.collection_count, baseline.collection_count + 1);
        assert!(collected.collection_time_ms > baseline.collection_time_ms);
    }

    #[test]
    fn test_minor_collection_empties_eden() {
        let config = HostConfig {
            major_ratio: 0.0,
            ..seeded(9)
        };
        let host = host(&config);

        let event = host.collect_now();

        assert_eq!(event.action, GcAction::MinorGc);
        assert_eq!(event.memory_after[EDEN_SPACE].used, 0);
        assert!(event.memory_before[EDEN_SPACE].used >= EDEN_CAPACITY / 4);
        assert_eq!(event.memory_before.len(), 4);
    }

    #[test]
    fn test_major_collection_uses_old_collector() {
        let config = HostConfig {
            major_ratio: 1.0,
            ..seeded(9)
        };
        let host = host(&config);

        let event = host.collect_now();

        assert_eq!(event.action, GcAction::MajorGc);
        assert_eq!(event.collector_name, config.old_collector);
        assert!(event.memory_after[OLD_GEN].used < event.memory_before[OLD_GEN].used);
    }

    #[test]
    fn test_driver_publishes_until_stopped() {
        let host = host(&seeded(5));
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let handle = host
            .event_source()
            .subscribe(Arc::new(move |_: &GcEvent| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        host.run_for(Duration::from_millis(100)).unwrap();
        assert!(!host.is_running());

        let delivered = seen.load(Ordering::SeqCst);
        assert!(delivered > 0);

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(seen.load(Ordering::SeqCst), delivered);
        host.event_source().unsubscribe(handle);
    }

    #[test]
    fn test_detached_host_delivers_nothing() {
        let config = HostConfig {
            notifications: false,
            ..seeded(5)
        };
        let host = host(&config);
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        host.event_source().subscribe(Arc::new(move |_: &GcEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        host.collect_now();

        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = HostConfig {
            interval_ms: 0,
            ..Default::default()
        };
        assert!(SimulatedHost::new(&config, &MonitorConfig::default()).is_err());
    }
}
