//! Epoch time conversion for display.

use chrono::{DateTime, Local, TimeZone};

/// Converts seconds since the epoch to local calendar time.
///
/// Returns `None` when the value has no unambiguous local representation,
/// which callers treat as an unrenderable timestamp.
pub fn local_datetime(secs: i64) -> Option<DateTime<Local>> {
    Local.timestamp_opt(secs, 0).single()
}

/// Renders an epoch timestamp with a strftime-style format string.
///
/// Conversion failure yields an empty string rather than an error, so
/// display code never has to special-case out-of-range timestamps.
///
/// # Example
///
/// ```
/// use stanza_utils::time::strftime_local;
///
/// // 2000-07-01T00:00:00Z, mid-year so every zone agrees on the year
/// assert_eq!(strftime_local(962409600, "%Y"), "2000");
/// ```
pub fn strftime_local(secs: i64, fmt: &str) -> String {
    match local_datetime(secs) {
        Some(dt) => dt.format(fmt).to_string(),
        None => String::new(),
    }
}
