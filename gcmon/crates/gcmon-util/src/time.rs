//! Duration formatting for report lines.

/// Format a millisecond duration as minutes and whole seconds.
///
/// Sub-second remainders are discarded. Durations that are not positive, or
/// that truncate to zero whole seconds, render as `"0ms"` so a report line is
/// never left blank.
///
/// # Examples
///
/// ```rust
/// use gcmon_util::format_time;
///
/// assert_eq!(format_time(0), "0ms");
/// assert_eq!(format_time(65_000), "1m 5s");
/// assert_eq!(format_time(60_000), "1m");
/// assert_eq!(format_time(400), "0ms");
/// ```
pub fn format_time(millis: i64) -> String {
    if millis <= 0 {
        return "0ms".to_string();
    }

    let total_seconds = millis / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::with_capacity(2);
    if minutes != 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds != 0 {
        parts.push(format!("{}s", seconds));
    }

    if parts.is_empty() {
        "0ms".to_string()
    } else {
        parts.join(" ")
    }
}
