//! Monitor Session - Live GC Report Stream
//!
//! A session owns exactly one subscription on an [`EventSource`]. For every
//! delivered event the listener clones the event and hands rendering plus
//! delivery to the ordered executor, so the host's notification thread only
//! pays for a clone and a channel send.
//!
//! ```text
//!  Inactive ──start──► Active ──close──► Inactive (terminal)
//! ```

use crate::event::GcEvent;
use crate::executor::TaskExecutor;
use crate::report::render_delta;
use crate::sink::ResponseSink;
use crate::source::{EventSource, GcListener, SubscriptionHandle};
use parking_lot::Mutex;
use std::sync::Arc;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Inactive,
    Active,
}

/// One active GC monitor
pub struct MonitorSession {
    source: Arc<dyn EventSource>,
    subscription: Mutex<Option<SubscriptionHandle>>,
}

impl MonitorSession {
    /// Subscribe to `source` and broadcast a delta report per event to `sink`
    pub fn start(
        source: Arc<dyn EventSource>,
        executor: Arc<dyn TaskExecutor>,
        sink: Arc<dyn ResponseSink>,
    ) -> Self {
        let listener: GcListener = Arc::new(move |event: &GcEvent| {
            let event = event.clone();
            let sink = Arc::clone(&sink);
            let event_id = event.id;

            let submitted = executor.execute(Box::new(move || {
                for message in render_delta(&event) {
                    sink.broadcast(message);
                }
            }));

            if let Err(err) = submitted {
                log::warn!("dropping report for GC event {}: {}", event_id, err);
            }
        });

        let handle = source.subscribe(listener);
        log::debug!("GC monitor session started (subscription {})", handle.id());

        Self {
            source,
            subscription: Mutex::new(Some(handle)),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.subscription.lock().is_some() {
            SessionState::Active
        } else {
            SessionState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Unsubscribe from the event source
    ///
    /// Only the first call has an effect. A publish already in flight may
    /// still deliver one more event after this returns.
    pub fn close(&self) {
        let handle = self.subscription.lock().take();
        if let Some(handle) = handle {
            self.source.unsubscribe(handle);
            log::debug!("GC monitor session closed (subscription {})", handle.id());
        }
    }
}

impl Drop for MonitorSession {
    fn drop(&mut self) {
        self.close();
    }
}
