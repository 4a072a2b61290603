//! Monitor command implementation.
//!
//! Turns the GC monitor on, lets the simulated host collect for a while, and
//! turns the monitor off again once every report has been printed.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::console::ConsoleSink;
use crate::error::Result;

use super::MonitorHost;

/// Label of the toggle command.
const TOGGLE: &str = "gcmonitor";

/// Arguments for the monitor command.
#[derive(Debug, Clone)]
pub struct MonitorArgs {
    /// Milliseconds of simulated activity while monitoring.
    pub duration_ms: u64,
}

impl Default for MonitorArgs {
    fn default() -> Self {
        Self { duration_ms: 2000 }
    }
}

/// Execute the monitor command.
pub fn run_monitor(args: MonitorArgs, config: &Config) -> Result<()> {
    let sink = Arc::new(ConsoleSink::stdout(config.monitor.message_prefix.clone()));
    let monitor = MonitorHost::boot(config, sink)?;
    stream(&monitor, Duration::from_millis(args.duration_ms))?;
    monitor.close();
    Ok(())
}

/// Toggle on, drive the host for `duration`, flush, toggle off.
fn stream(monitor: &MonitorHost, duration: Duration) -> Result<()> {
    monitor.dispatch(TOGGLE, &[])?;
    let driven = monitor.host().run_for(duration);

    // Reports queued before the toggle must print ahead of "disabled".
    let flushed = monitor.flush();
    monitor.dispatch(TOGGLE, &[])?;
    driven?;
    flushed?;
    monitor.flush()
}
