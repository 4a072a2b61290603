//! Byte count formatting.

/// Units used when scaling byte counts, in powers of 1024.
pub const SIZE_UNITS: [&str; 6] = ["bytes", "KB", "MB", "GB", "TB", "PB"];

const UNIT_STEP: f64 = 1024.0;

/// Format a byte count using the largest unit that keeps the value >= 1.
///
/// The scaled value is always rendered with one decimal place.
///
/// # Examples
///
/// ```rust
/// use gcmon_util::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 bytes");
/// assert_eq!(format_bytes(400), "400.0 bytes");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 bytes".to_string();
    }

    let mut scaled = bytes as f64;
    let mut unit = 0;
    while scaled >= UNIT_STEP && unit < SIZE_UNITS.len() - 1 {
        scaled /= UNIT_STEP;
        unit += 1;
    }

    format!("{:.1} {}", scaled, SIZE_UNITS[unit])
}
