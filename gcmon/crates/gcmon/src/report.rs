//! Delta Report - Per-collection Memory Changes
//!
//! Compares region usage before and after one collection and describes what
//! moved. Rendering is pure; delivery is left to the monitor session.
//!
//! ```text
//! Young Gen GC lasting 12.5 ms. (cause = Allocation Failure)
//!   40.0 MB freed from Eden Space
//!     40.0 MB → 0 bytes (100%)
//!   2.0 MB moved to Survivor Space
//!     1.0 MB → 3.0 MB
//! ```

use crate::event::{GcEvent, MemoryUsage};
use crate::sink::Message;
use gcmon_util::{format_bytes, format_decimal, percent};

/// Change observed in one region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionDelta {
    /// Usage dropped by `bytes`
    Freed { bytes: u64 },
    /// Usage grew by `bytes`
    Moved { bytes: u64 },
}

impl RegionDelta {
    /// Compare two usage records, `None` when usage did not change
    pub fn between(before: &MemoryUsage, after: &MemoryUsage) -> Option<Self> {
        if before.used > after.used {
            Some(RegionDelta::Freed {
                bytes: before.used - after.used,
            })
        } else if after.used > before.used {
            Some(RegionDelta::Moved {
                bytes: after.used - before.used,
            })
        } else {
            None
        }
    }
}

/// Header line for an event
pub fn header(event: &GcEvent) -> String {
    let cause = match &event.cause {
        Some(cause) => format!(" (cause = {})", cause),
        None => String::new(),
    };

    format!(
        "{} GC lasting {} ms.{}",
        event.action.label(),
        format_decimal(event.duration_ms),
        cause
    )
}

/// Regions that changed, in `memory_after` order
///
/// Regions missing from `memory_before` are skipped since no delta can be
/// computed for them.
pub fn region_deltas(event: &GcEvent) -> Vec<(&str, &MemoryUsage, &MemoryUsage, RegionDelta)> {
    event
        .memory_after
        .iter()
        .filter_map(|(region, after)| {
            let before = event.memory_before.get(region)?;
            let delta = RegionDelta::between(before, after)?;
            Some((region.as_str(), before, after, delta))
        })
        .collect()
}

/// Render the full report for one event
///
/// The header is prefixed; region lines are indented and unprefixed.
pub fn render_delta(event: &GcEvent) -> Vec<Message> {
    let mut report = vec![Message::prefixed(header(event))];

    for (region, before, after, delta) in region_deltas(event) {
        match delta {
            RegionDelta::Freed { bytes } => {
                report.push(Message::plain(format!(
                    "  {} freed from {}",
                    format_bytes(bytes),
                    region
                )));
                report.push(Message::plain(format!(
                    "    {} → {} ({})",
                    format_bytes(before.used),
                    format_bytes(after.used),
                    percent(bytes as f64, before.used as f64)
                )));
            }
            RegionDelta::Moved { bytes } => {
                report.push(Message::plain(format!(
                    "  {} moved to {}",
                    format_bytes(bytes),
                    region
                )));
                report.push(Message::plain(format!(
                    "    {} → {}",
                    format_bytes(before.used),
                    format_bytes(after.used)
                )));
            }
        }
    }

    report
}
