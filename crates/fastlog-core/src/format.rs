//! Human-readable rendering of timestamps and durations.

use crate::types::{Timestamp, HOUR_MS, MINUTE_MS, SECOND_MS};
use time::{OffsetDateTime, UtcOffset};

/// `yyyy-MM-dd HH:mm:ss`
pub const LONG_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";
/// `EEE dd HH:mm`
pub const SHORT_FORMAT: &str = "[weekday repr:short] [day] [hour]:[minute]";

/// Convert epoch milliseconds to a datetime at `offset`.
pub fn to_datetime(ts: Timestamp, offset: UtcOffset) -> Option<OffsetDateTime> {
    let nanos = i128::from(ts) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .map(|dt| dt.to_offset(offset))
}

/// Epoch milliseconds of a datetime.
pub fn from_datetime(dt: OffsetDateTime) -> Timestamp {
    (dt.unix_timestamp_nanos() / 1_000_000) as Timestamp
}

/// Render `ts` with a `time` format description. Falls back to the raw
/// millisecond value when the timestamp is out of range.
pub fn format_with(ts: Timestamp, offset: UtcOffset, description: &str) -> String {
    let rendered = to_datetime(ts, offset).and_then(|dt| {
        let items = time::format_description::parse(description).ok()?;
        dt.format(&items).ok()
    });
    rendered.unwrap_or_else(|| ts.to_string())
}

pub fn format_ts(ts: Timestamp, offset: UtcOffset) -> String {
    format_with(ts, offset, LONG_FORMAT)
}

pub fn format_short(ts: Timestamp, offset: UtcOffset) -> String {
    format_with(ts, offset, SHORT_FORMAT)
}

/// `HH:MM:SS` (or `HH:MM`) for a millisecond span. Hours are not wrapped.
pub fn format_duration(ms: i64, omit_seconds: bool) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let rem = ms.unsigned_abs();
    let h = rem / HOUR_MS as u64;
    let m = (rem % HOUR_MS as u64) / MINUTE_MS as u64;
    let s = (rem % MINUTE_MS as u64) / SECOND_MS as u64;
    if omit_seconds {
        format!("{sign}{h:02}:{m:02}")
    } else {
        format!("{sign}{h:02}:{m:02}:{s:02}")
    }
}
