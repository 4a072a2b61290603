//! Snapshot command implementation.
//!
//! Lets the simulated host run for a warm-up period, then answers the `gc`
//! command once, either as report text or as JSON collector summaries.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use gcmon::platform::PlatformStatistics;
use gcmon::stats::{poll_subtract_baseline, summarize, CollectorSummary};
use gcmon::Platform;

use crate::config::Config;
use crate::console::ConsoleSink;
use crate::error::Result;

use super::MonitorHost;

/// Arguments for the snapshot command.
#[derive(Debug, Clone, Default)]
pub struct SnapshotArgs {
    /// Milliseconds of simulated activity before the snapshot.
    pub warmup_ms: u64,
    /// Print collector summaries as JSON instead of report text.
    pub json: bool,
}

/// Execute the snapshot command.
pub fn run_snapshot(args: SnapshotArgs, config: &Config) -> Result<()> {
    let sink = Arc::new(ConsoleSink::stdout(config.monitor.message_prefix.clone()));
    let monitor = MonitorHost::boot(config, sink)?;

    monitor.host().run_for(Duration::from_millis(args.warmup_ms))?;

    if args.json {
        let summaries = collector_summaries(&monitor);
        let mut out = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &summaries)?;
        writeln!(out)?;
    } else {
        monitor.dispatch("gc", &[])?;
    }

    monitor.close();
    Ok(())
}

/// Per-collector figures since startup, as `gc` would report them.
pub fn collector_summaries(monitor: &MonitorHost) -> Vec<CollectorSummary> {
    let platform = monitor.platform().as_ref();
    let uptime_ms = platform.uptime_ms();
    let stats = poll_subtract_baseline(
        &PlatformStatistics(platform),
        &platform.startup_gc_statistics(),
    );
    summarize(&stats, uptime_ms)
}
