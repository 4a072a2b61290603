//! GC Monitoring Module - `gc` and `gcmonitor` Commands
//!
//! `gc` replies with collector statistics accumulated since startup.
//! `gcmonitor` (alias `gcmonitoring`) toggles a [`MonitorSession`] that
//! broadcasts a delta report after every collection.
//!
//! At most one session exists per module. The slot is a mutex-guarded
//! `Option`, so concurrent toggles resolve to exactly one winner.

use super::{Command, CommandContext, CommandModule, CommandRegistry};
use crate::error::Result;
use crate::platform::PlatformStatistics;
use crate::session::MonitorSession;
use crate::sink::Message;
use crate::stats::{poll_subtract_baseline, render_snapshot};
use parking_lot::Mutex;
use std::sync::Arc;

pub const CALCULATING_MESSAGE: &str = "Calculating GC statistics...";
pub const NO_DATA_MESSAGE: &str = "No garbage collectors are reporting data.";
pub const MONITOR_ENABLED_MESSAGE: &str = "GC monitor enabled.";
pub const MONITOR_DISABLED_MESSAGE: &str = "GC monitor disabled.";

type SessionSlot = Arc<Mutex<Option<MonitorSession>>>;

/// Command module owning the GC monitor session
#[derive(Default)]
pub struct GcMonitoringModule {
    active: SessionSlot,
}

impl GcMonitoringModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a monitor session is currently running
    pub fn is_monitoring(&self) -> bool {
        self.active.lock().is_some()
    }
}

impl CommandModule for GcMonitoringModule {
    fn register_commands(&self, registry: &mut CommandRegistry) -> Result<()> {
        registry.register(
            Command::builder()
                .aliases(["gc"])
                .executor(snapshot)
                .build()?,
        )?;

        let active = Arc::clone(&self.active);
        registry.register(
            Command::builder()
                .aliases(["gcmonitor", "gcmonitoring"])
                .executor(move |context| toggle_monitor(&active, context))
                .build()?,
        )?;

        Ok(())
    }

    fn close(&self) {
        if let Some(session) = self.active.lock().take() {
            session.close();
        }
    }
}

impl Drop for GcMonitoringModule {
    fn drop(&mut self) {
        CommandModule::close(self);
    }
}

fn snapshot(context: &CommandContext<'_>) -> Result<()> {
    let response = context.response;
    response.reply(Message::prefixed(CALCULATING_MESSAGE));

    let platform = context.platform.as_ref();
    let uptime_ms = platform.uptime_ms();
    let baseline = platform.startup_gc_statistics();
    let stats = poll_subtract_baseline(&PlatformStatistics(platform), &baseline);

    match render_snapshot(&stats, uptime_ms) {
        Some(report) => {
            for message in report {
                response.reply(message);
            }
        }
        None => response.reply(Message::prefixed(NO_DATA_MESSAGE)),
    }

    Ok(())
}

fn toggle_monitor(active: &Mutex<Option<MonitorSession>>, context: &CommandContext<'_>) -> Result<()> {
    let enabled = {
        let mut slot = active.lock();
        match slot.take() {
            Some(session) => {
                session.close();
                false
            }
            None => {
                *slot = Some(MonitorSession::start(
                    context.platform.event_source(),
                    context.platform.executor(),
                    Arc::clone(context.response),
                ));
                true
            }
        }
    };

    let message = if enabled {
        MONITOR_ENABLED_MESSAGE
    } else {
        MONITOR_DISABLED_MESSAGE
    };
    context.response.broadcast(Message::prefixed(message));

    Ok(())
}
