//! GC Events - Host Collection Notifications
//!
//! One [`GcEvent`] is produced per completed collection. It carries the
//! memory usage of every region before and after the collection, which the
//! delta reporter compares.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Host action string for a young-generation collection
pub const MINOR_GC_ACTION: &str = "end of minor GC";
/// Host action string for an old-generation collection
pub const MAJOR_GC_ACTION: &str = "end of major GC";

/// Kind of collection that just finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GcAction {
    MinorGc,
    MajorGc,
    /// Any other action, kept verbatim
    Other(String),
}

impl GcAction {
    /// Classify the action string reported by the host
    pub fn from_host(action: &str) -> Self {
        match action {
            MINOR_GC_ACTION => GcAction::MinorGc,
            MAJOR_GC_ACTION => GcAction::MajorGc,
            other => GcAction::Other(other.to_string()),
        }
    }

    /// Label used in report headers
    pub fn label(&self) -> &str {
        match self {
            GcAction::MinorGc => "Young Gen",
            GcAction::MajorGc => "Old Gen",
            GcAction::Other(action) => action.as_str(),
        }
    }
}

/// Usage of one memory region, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub init: u64,
    pub used: u64,
    pub committed: u64,
    /// `None` when the region has no defined maximum
    pub max: Option<u64>,
}

impl MemoryUsage {
    /// Usage record with only `used` known
    pub fn used(used: u64) -> Self {
        Self {
            used,
            committed: used,
            ..Default::default()
        }
    }
}

/// Region name to usage, in host order
pub type RegionUsage = IndexMap<String, MemoryUsage>;

/// One completed garbage collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcEvent {
    /// Host-assigned sequence number
    pub id: u64,
    /// Collector that ran
    pub collector_name: String,
    pub action: GcAction,
    pub cause: Option<String>,
    pub duration_ms: f64,
    pub memory_before: RegionUsage,
    pub memory_after: RegionUsage,
}

impl GcEvent {
    pub fn new(collector_name: impl Into<String>, action: GcAction, duration_ms: f64) -> Self {
        Self {
            id: 0,
            collector_name: collector_name.into(),
            action,
            cause: None,
            duration_ms,
            memory_before: RegionUsage::new(),
            memory_after: RegionUsage::new(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Record a region's usage on both sides of the collection
    pub fn with_region(mut self, region: impl Into<String>, before: MemoryUsage, after: MemoryUsage) -> Self {
        let region = region.into();
        self.memory_before.insert(region.clone(), before);
        self.memory_after.insert(region, after);
        self
    }

    /// Record a region that only exists after the collection
    pub fn with_region_after(mut self, region: impl Into<String>, after: MemoryUsage) -> Self {
        self.memory_after.insert(region.into(), after);
        self
    }
}
