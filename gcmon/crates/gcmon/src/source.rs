//! GC Event Source - Notification Fan-out
//!
//! The host calls [`GcEventSource::publish`] from its own notification thread
//! after every collection; each subscribed listener is invoked on that thread.
//!
//! ```text
//! host notification thread
//!        │ publish(event)
//!        ▼
//! ┌──────────────────┐    ┌────────────┐
//! │  GcEventSource   │───►│ listener 1 │
//! │  (handle → fn)   │───►│ listener 2 │
//! └──────────────────┘    └────────────┘
//! ```
//!
//! Hosts with no notification mechanism use [`DetachedEventSource`], which
//! accepts subscriptions and never delivers anything.

use crate::event::GcEvent;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked for every delivered event
pub type GcListener = Arc<dyn Fn(&GcEvent) + Send + Sync>;

/// Identifies one subscription for later removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Subscription contract of a GC notification source
#[cfg_attr(test, mockall::automock)]
pub trait EventSource: Send + Sync {
    /// Register `listener` for all future events
    fn subscribe(&self, listener: GcListener) -> SubscriptionHandle;

    /// Remove a subscription; unknown handles are ignored
    fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// In-process event source driven by the host
pub struct GcEventSource {
    listeners: RwLock<IndexMap<SubscriptionHandle, GcListener>>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl GcEventSource {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(IndexMap::new()),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Deliver `event` to every current listener
    ///
    /// Listeners are invoked without holding the registry lock, so a listener
    /// may unsubscribe itself. A panicking listener is logged and does not
    /// stop delivery to the others.
    ///
    /// Returns the number of listeners invoked.
    pub fn publish(&self, event: &GcEvent) -> usize {
        if self.is_closed() {
            return 0;
        }

        let listeners: Vec<(SubscriptionHandle, GcListener)> = self
            .listeners
            .read()
            .iter()
            .map(|(handle, listener)| (*handle, Arc::clone(listener)))
            .collect();

        for (handle, listener) in &listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                log::error!(
                    "GC listener {} panicked while handling event {}",
                    handle.id(),
                    event.id
                );
            }
        }

        listeners.len()
    }

    /// Number of active subscriptions
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Detach from the host: drop every listener and ignore later publishes
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        let removed = {
            let mut listeners = self.listeners.write();
            let count = listeners.len();
            listeners.clear();
            count
        };
        if removed > 0 {
            log::debug!("GC event source closed with {} listener(s) attached", removed);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Default for GcEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for GcEventSource {
    fn subscribe(&self, listener: GcListener) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        if self.is_closed() {
            log::debug!("subscription {} on closed event source ignored", handle.id());
            return handle;
        }
        self.listeners.write().insert(handle, listener);
        handle
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.listeners.write().shift_remove(&handle);
    }
}

/// Event source for hosts that expose no GC notifications
#[derive(Debug, Default)]
pub struct DetachedEventSource {
    next_id: AtomicU64,
}

impl DetachedEventSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSource for DetachedEventSource {
    fn subscribe(&self, _listener: GcListener) -> SubscriptionHandle {
        SubscriptionHandle(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn unsubscribe(&self, _handle: SubscriptionHandle) {}
}
