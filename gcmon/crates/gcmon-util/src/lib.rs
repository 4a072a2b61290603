//! gcmon-util - Display Formatting Helpers
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! Small, allocation-light helpers that turn raw collector numbers into the
//! text shown in GC reports:
//!
//! - [`format_bytes`]: byte counts scaled to the largest fitting unit
//! - [`percent`]: truncated integer percentages
//! - [`format_decimal`]: numbers with at most two fraction digits
//! - [`format_time`]: millisecond durations as `"<m>m <s>s"`
//!
//! All helpers are pure functions and never fail; out-of-range input
//! degrades to a zero rendering instead of an error.

pub mod bytes;
pub mod number;
pub mod time;

pub use bytes::format_bytes;
pub use number::{format_decimal, percent};
pub use time::format_time;
