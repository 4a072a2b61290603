//! # gcmon - Garbage Collection Monitoring Commands
//!
//! gcmon attaches to a host runtime's GC notifications and answers two text
//! commands:
//!
//! - **`gc`**: collector statistics accumulated since the server started
//! - **`gcmonitor`** / **`gcmonitoring`**: toggles a live stream of
//!   per-collection memory deltas, broadcast to every recipient
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   Host Runtime (Platform)                  │
//! │  startup counters   live counters   notification thread    │
//! └────────┬───────────────┬──────────────────┬───────────────┘
//!          │               │                  │ publish(GcEvent)
//!          ▼               ▼                  ▼
//!   ┌─────────────────────────────┐   ┌──────────────────┐
//!   │  gc: poll - baseline        │   │  GcEventSource   │
//!   │      → snapshot report      │   └────────┬─────────┘
//!   └──────────────┬──────────────┘            │ listener
//!                  │ reply                     ▼
//!                  │                  ┌──────────────────┐
//!                  │                  │  MonitorSession  │
//!                  │                  └────────┬─────────┘
//!                  │                           │ execute(task)
//!                  │                           ▼
//!                  │                  ┌──────────────────┐
//!                  │                  │  SerialExecutor  │ render_delta
//!                  │                  └────────┬─────────┘
//!                  ▼                           ▼ broadcast
//!          ┌──────────────────────────────────────────┐
//!          │              ResponseSink                 │
//!          └──────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gcmon::{CommandContext, CommandRegistry, GcMonitoringModule};
//! use std::sync::Arc;
//!
//! let mut registry = CommandRegistry::new();
//! registry.register_module(Arc::new(GcMonitoringModule::new()))?;
//!
//! let context = CommandContext { platform: &platform, response: &sink, arguments: &[] };
//! registry.dispatch("gc", &context)?;         // snapshot
//! registry.dispatch("gcmonitor", &context)?;  // start streaming
//! registry.dispatch("gcmonitor", &context)?;  // stop streaming
//! registry.close_all();
//! ```
//!
//! ## Thread Safety
//!
//! - Listeners run on the host's notification thread and only enqueue work
//! - Reports are rendered and delivered on one worker thread, in event order
//! - Toggling is serialized by the module's session mutex
//!
//! ## Modules
//!
//! - [`command`]: command registry and the GC monitoring module
//! - [`config`]: delivery configuration and validation
//! - [`error`]: error types
//! - [`event`]: GC notification model
//! - [`executor`]: ordered background executor
//! - [`platform`]: host services trait
//! - [`report`]: per-collection delta reports
//! - [`session`]: live monitor session
//! - [`sink`]: response messages and sinks
//! - [`source`]: event source and subscriptions
//! - [`stats`]: collector statistics and snapshot reports

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod executor;
pub mod platform;
pub mod report;
pub mod session;
pub mod sink;
pub mod source;
pub mod stats;

pub use command::{Command, CommandContext, CommandModule, CommandRegistry, GcMonitoringModule};
pub use config::MonitorConfig;
pub use error::{GcmonError, Result};
pub use event::{GcAction, GcEvent, MemoryUsage};
pub use executor::{SerialExecutor, TaskExecutor};
pub use platform::Platform;
pub use session::{MonitorSession, SessionState};
pub use sink::{CollectingSink, Message, ResponseSink};
pub use source::{DetachedEventSource, EventSource, GcEventSource, SubscriptionHandle};
pub use stats::{CollectorStatistics, StatisticsMap};

/// gcmon version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
