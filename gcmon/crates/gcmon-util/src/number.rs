//! Numeric formatting: percentages and short decimals.

/// Format `value` as a percentage of `max`, truncated towards zero.
///
/// A non-positive `max` renders as `"0%"`.
///
/// # Examples
///
/// ```rust
/// use gcmon_util::percent;
///
/// assert_eq!(percent(400.0, 1000.0), "40%");
/// assert_eq!(percent(1.0, 3.0), "33%");
/// ```
pub fn percent(value: f64, max: f64) -> String {
    if max <= 0.0 || !max.is_finite() || !value.is_finite() {
        return "0%".to_string();
    }

    let percent = (value * 100.0) / max;
    format!("{}%", percent.trunc() as i64)
}

/// Format a number with at most two fraction digits.
///
/// Trailing zeros and a dangling decimal point are dropped, so whole numbers
/// render without a fraction.
///
/// # Examples
///
/// ```rust
/// use gcmon_util::format_decimal;
///
/// assert_eq!(format_decimal(500.0), "500");
/// assert_eq!(format_decimal(12.346), "12.35");
/// assert_eq!(format_decimal(0.5), "0.5");
/// ```
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');

    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
