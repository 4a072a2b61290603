//! Snapshot Report - Point-in-time Collector Summary
//!
//! Turns a baseline-subtracted [`StatisticsMap`] into the lines shown by the
//! `gc` command.

use super::StatisticsMap;
use crate::sink::Message;
use gcmon_util::{format_decimal, format_time};
use serde::Serialize;

/// Title line of the snapshot report
pub const SNAPSHOT_TITLE: &str = "> Garbage Collector statistics";

/// Per-collector figures behind one report block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectorSummary {
    pub name: String,
    pub collection_count: u64,
    pub collection_time_ms: f64,
    /// `None` when the collector has not run since the baseline
    pub average_collection_time_ms: Option<f64>,
    /// `None` when the collector has not run since the baseline
    pub average_frequency_ms: Option<f64>,
}

/// Compute per-collector averages over `uptime_ms`, in map order
pub fn summarize(stats: &StatisticsMap, uptime_ms: i64) -> Vec<CollectorSummary> {
    let uptime_ms = uptime_ms as f64;
    stats
        .iter()
        .map(|(name, collector)| CollectorSummary {
            name: name.clone(),
            collection_count: collector.collection_count,
            collection_time_ms: collector.collection_time_ms,
            average_collection_time_ms: collector.average_collection_time_ms(),
            average_frequency_ms: collector.average_frequency_ms(uptime_ms),
        })
        .collect()
}

/// Render the snapshot report
///
/// Returns `None` when no collector contributed any lines, so the caller can
/// answer with a "no data" message instead of an empty report.
pub fn render_snapshot(stats: &StatisticsMap, uptime_ms: i64) -> Option<Vec<Message>> {
    let summaries = summarize(stats, uptime_ms);
    if summaries.is_empty() {
        return None;
    }

    let mut report = vec![Message::empty(), Message::plain(SNAPSHOT_TITLE)];

    for summary in &summaries {
        report.push(Message::empty());
        report.push(Message::plain(format!("    {} collector:", summary.name)));

        match (summary.average_collection_time_ms, summary.average_frequency_ms) {
            (Some(average_time), Some(average_frequency)) => {
                report.push(Message::plain(format!(
                    "      {} ms avg, {} total collections",
                    format_decimal(average_time),
                    summary.collection_count
                )));
                report.push(Message::plain(format!(
                    "      {} avg frequency",
                    format_time(average_frequency as i64)
                )));
            }
            _ => report.push(Message::plain("      0 collections")),
        }
    }

    Some(report)
}
