//! Serial Executor - Ordered Background Work
//!
//! Report rendering must never run on the host's notification thread. Tasks
//! are handed to a single worker thread through a channel and run strictly in
//! submission order, so reports for consecutive collections are delivered in
//! the order the collections happened.
//!
//! A panicking task is caught, logged and counted; the worker keeps running.

use crate::config::MonitorConfig;
use crate::error::{GcmonError, Result};
use crossbeam::channel::{self, Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Unit of background work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Fire-and-forget task submission
pub trait TaskExecutor: Send + Sync {
    /// Queue `task`; never blocks the caller
    fn execute(&self, task: Task) -> Result<()>;
}

/// Counters shared with the worker thread
#[derive(Debug, Default)]
struct WorkerStats {
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Single-worker FIFO executor
pub struct SerialExecutor {
    sender: Mutex<Option<Sender<Task>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    capacity: Option<usize>,
    stats: Arc<WorkerStats>,
}

impl SerialExecutor {
    /// Start an executor sized and named from `config`
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        config.validate()?;
        Self::spawn(&config.worker_thread_name, config.queue_capacity)
    }

    /// Start a worker thread named `name`
    ///
    /// `capacity` bounds the number of waiting tasks; `None` is unbounded.
    pub fn spawn(name: &str, capacity: Option<usize>) -> Result<Self> {
        let (sender, receiver) = match capacity {
            Some(capacity) => channel::bounded(capacity),
            None => channel::unbounded(),
        };

        let stats = Arc::new(WorkerStats::default());
        let worker_stats = Arc::clone(&stats);

        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || run_worker(receiver, worker_stats))?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
            capacity,
            stats,
        })
    }

    /// Wait until every task submitted before this call has run
    ///
    /// `timeout` covers both queueing the marker and waiting for it.
    pub fn flush(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let expired = || GcmonError::Timeout(format!("executor flush exceeded {:?}", timeout));

        let sender = match self.sender.lock().as_ref() {
            Some(sender) => sender.clone(),
            None => return Err(GcmonError::ExecutorStopped),
        };
        let (done_tx, done_rx) = channel::bounded::<()>(1);
        let marker: Task = Box::new(move || {
            let _ = done_tx.send(());
        });

        match sender.send_timeout(marker, timeout) {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(_)) => return Err(expired()),
            Err(SendTimeoutError::Disconnected(_)) => return Err(GcmonError::ExecutorStopped),
        }

        done_rx.recv_deadline(deadline).map_err(|_| expired())
    }

    /// Stop accepting tasks, run what is queued, and join the worker
    ///
    /// Calling this more than once is harmless.
    pub fn shutdown(&self) {
        drop(self.sender.lock().take());

        if let Some(handle) = self.handle.lock().take() {
            // The last owner may be dropped from inside a task.
            if handle.thread().id() == std::thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                log::error!("report worker terminated abnormally");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.sender.lock().is_some()
    }

    /// Tasks that ran to completion
    pub fn completed_tasks(&self) -> u64 {
        self.stats.completed.load(Ordering::Relaxed)
    }

    /// Tasks that panicked
    pub fn failed_tasks(&self) -> u64 {
        self.stats.failed.load(Ordering::Relaxed)
    }

    fn submit(&self, task: Task) -> Result<()> {
        let sender = match self.sender.lock().as_ref() {
            Some(sender) => sender.clone(),
            None => return Err(GcmonError::ExecutorStopped),
        };

        match sender.try_send(task) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(GcmonError::QueueFull {
                capacity: self.capacity.unwrap_or_default(),
            }),
            Err(TrySendError::Disconnected(_)) => Err(GcmonError::ExecutorStopped),
        }
    }
}

impl TaskExecutor for SerialExecutor {
    fn execute(&self, task: Task) -> Result<()> {
        self.submit(task)
    }
}

impl Drop for SerialExecutor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(receiver: Receiver<Task>, stats: Arc<WorkerStats>) {
    for task in receiver.iter() {
        match catch_unwind(AssertUnwindSafe(task)) {
            Ok(()) => {
                stats.completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(panic) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("report task panicked: {}", reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_tasks_run_in_submission_order() {
        let executor = SerialExecutor::spawn("test-order", None).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..100 {
            let seen = Arc::clone(&seen);
            executor
                .execute(Box::new(move || seen.lock().push(i)))
                .unwrap();
        }
        executor.flush(FLUSH_TIMEOUT).unwrap();

        assert_eq!(*seen.lock(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_panicking_task_does_not_stop_worker() {
        let executor = SerialExecutor::spawn("test-panic", None).unwrap();
        let ran = Arc::new(AtomicU64::new(0));

        executor.execute(Box::new(|| panic!("render failure"))).unwrap();
        let counter = Arc::clone(&ran);
        executor
            .execute(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        executor.flush(FLUSH_TIMEOUT).unwrap();

        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(executor.failed_tasks(), 1);
        assert!(executor.is_running());
    }

    #[test]
    fn test_execute_after_shutdown() {
        let executor = SerialExecutor::spawn("test-stopped", None).unwrap();
        executor.shutdown();
        executor.shutdown();

        let result = executor.execute(Box::new(|| {}));
        assert!(matches!(result, Err(GcmonError::ExecutorStopped)));
        assert!(!executor.is_running());
    }

    #[test]
    fn test_shutdown_drains_queue() {
        let executor = SerialExecutor::spawn("test-drain", None).unwrap();
        let ran = Arc::new(AtomicU64::new(0));
        for _ in 0..10 {
            let ran = Arc::clone(&ran);
            executor
                .execute(Box::new(move || {
                    ran.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }

        executor.shutdown();

        assert_eq!(ran.load(Ordering::SeqCst), 10);
        assert_eq!(executor.completed_tasks(), 10);
    }

    #[test]
    fn test_bounded_queue_rejects_overflow() {
        let executor = SerialExecutor::spawn("test-bounded", Some(1)).unwrap();
        let (release_tx, release_rx) = channel::bounded::<()>(0);
        let (started_tx, started_rx) = channel::bounded::<()>(1);

        executor
            .execute(Box::new(move || {
                let _ = started_tx.send(());
                let _ = release_rx.recv();
            }))
            .unwrap();
        started_rx.recv_timeout(FLUSH_TIMEOUT).unwrap();

        executor.execute(Box::new(|| {})).unwrap();
        let overflow = executor.execute(Box::new(|| {}));
        assert!(matches!(overflow, Err(GcmonError::QueueFull { capacity: 1 })));

        release_tx.send(()).unwrap();
        executor.flush(FLUSH_TIMEOUT).unwrap();
    }

    #[test]
    fn test_flush_times_out_on_full_queue() {
        let executor = Arc::new(SerialExecutor::spawn("test-full-flush", Some(1)).unwrap());
        let (release_tx, release_rx) = channel::bounded::<()>(0);
        let (started_tx, started_rx) = channel::bounded::<()>(1);

        executor
            .execute(Box::new(move || {
                let _ = started_tx.send(());
                let _ = release_rx.recv();
            }))
            .unwrap();
        started_rx.recv_timeout(FLUSH_TIMEOUT).unwrap();
        executor.execute(Box::new(|| {})).unwrap();

        let (result_tx, result_rx) = channel::bounded(1);
        let flusher = Arc::clone(&executor);
        let waiter = std::thread::spawn(move || {
            let started = Instant::now();
            let result = flusher.flush(Duration::from_millis(50));
            let _ = result_tx.send((result, started.elapsed()));
        });

        let (result, elapsed) = result_rx.recv_timeout(FLUSH_TIMEOUT).unwrap();
        assert!(matches!(result, Err(GcmonError::Timeout(_))));
        assert!(elapsed < Duration::from_secs(2));

        release_tx.send(()).unwrap();
        waiter.join().unwrap();
        executor.flush(FLUSH_TIMEOUT).unwrap();
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = MonitorConfig {
            queue_capacity: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            SerialExecutor::from_config(&config),
            Err(GcmonError::Configuration(_))
        ));
    }
}
