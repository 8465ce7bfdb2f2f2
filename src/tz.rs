//! Timestamp parsing and formatting helpers.
//!
//! All database writes are RFC-3339 UTC strings with millisecond precision.
//! Because the format is fixed-width and zero-offset, lexicographic comparison
//! of stored strings matches chronological comparison, which is what the
//! half-open range filters in [`crate::reports`] rely on.

use anyhow::Context;
use chrono::{DateTime, Utc};

/// RFC-3339 with offset -> UTC.
///
/// Example:
/// - "2025-10-10T09:30:00-05:00" -> "2025-10-10T14:30:00Z"
pub fn parse_ts_to_utc(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let dt = DateTime::parse_from_rfc3339(s).with_context(|| format!("bad rfc3339: {s}"))?;
    Ok(dt.with_timezone(&Utc))
}

/// Format a UTC datetime as an RFC-3339 string with millisecond precision.
pub fn to_rfc3339_millis(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
