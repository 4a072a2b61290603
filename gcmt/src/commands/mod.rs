//! Command modules for the gcmt CLI.
//!
//! Each subcommand lives in its own file. All of them drive the same
//! [`MonitorHost`]: a simulated runtime with the GC monitoring module
//! registered against it.

pub mod monitor;
pub mod repl;
pub mod snapshot;

pub use monitor::{run_monitor, MonitorArgs};
pub use repl::{run_repl, ReplArgs};
pub use snapshot::{run_snapshot, SnapshotArgs};

use std::sync::Arc;
use std::time::Duration;

use gcmon::{CommandContext, CommandRegistry, GcMonitoringModule, Platform, ResponseSink};

use crate::config::Config;
use crate::error::Result;
use crate::host::SimulatedHost;

/// How long to wait for queued reports before giving up.
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Simulated runtime plus the command registry answering on it.
pub struct MonitorHost {
    host: Arc<SimulatedHost>,
    platform: Arc<dyn Platform>,
    response: Arc<dyn ResponseSink>,
    module: Arc<GcMonitoringModule>,
    registry: CommandRegistry,
}

impl MonitorHost {
    /// Boot the host and register the GC commands.
    pub fn boot(config: &Config, response: Arc<dyn ResponseSink>) -> Result<Self> {
        let host = Arc::new(SimulatedHost::new(&config.host, &config.monitor)?);
        let module = Arc::new(GcMonitoringModule::new());

        let mut registry = CommandRegistry::new();
        registry.register_module(module.clone())?;
        tracing::debug!("registered commands: {}", registry.aliases().join(", "));

        Ok(Self {
            platform: host.clone(),
            host,
            response,
            module,
            registry,
        })
    }

    pub fn host(&self) -> &SimulatedHost {
        &self.host
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    pub fn is_monitoring(&self) -> bool {
        self.module.is_monitoring()
    }

    /// Every command label the registry answers to.
    pub fn aliases(&self) -> Vec<&str> {
        self.registry.aliases()
    }

    /// Run the command registered under `label`.
    pub fn dispatch(&self, label: &str, arguments: &[String]) -> Result<()> {
        let context = CommandContext {
            platform: &self.platform,
            response: &self.response,
            arguments,
        };
        self.registry.dispatch(label, &context)?;
        Ok(())
    }

    /// Wait until every queued report has been written.
    pub fn flush(&self) -> Result<()> {
        self.host.flush(FLUSH_TIMEOUT)
    }

    /// Close the command modules and shut the host down.
    pub fn close(&self) {
        self.registry.close_all();
        self.host.shutdown();
    }
}

impl Drop for MonitorHost {
    fn drop(&mut self) {
        self.close();
    }
}
