//! Wall clock, local-time display, and parsing of user-supplied times.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use fastlog_core::format::{format_duration, format_short, format_ts};
use fastlog_core::{is_representable, Timestamp};
use time::UtcOffset;

pub fn now_ms() -> Timestamp {
    fastlog_core::format::from_datetime(time::OffsetDateTime::now_utc())
}

/// Local UTC offset in effect at `ts`.
pub fn offset_at(ts: Timestamp) -> UtcOffset {
    let secs = Local
        .timestamp_millis_opt(ts)
        .single()
        .map(|dt| dt.offset().local_minus_utc())
        .unwrap_or(0);
    UtcOffset::from_whole_seconds(secs).unwrap_or(UtcOffset::UTC)
}

/// Offset used for whole-log exports.
pub fn local_offset() -> UtcOffset {
    offset_at(now_ms())
}

/// `yyyy-MM-dd HH:mm:ss` in local time.
pub fn long(ts: Timestamp) -> String {
    format_ts(ts, offset_at(ts))
}

/// `EEE dd HH:mm` in local time.
pub fn short(ts: Timestamp) -> String {
    format_short(ts, offset_at(ts))
}

pub fn span(ms: i64) -> String {
    format_duration(ms, false)
}

pub fn span_short(ms: i64) -> String {
    format_duration(ms, true)
}

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse `now`, epoch milliseconds, RFC 3339, or a local `YYYY-MM-DD HH:MM[:SS]`.
///
/// Only years 0000 to 9999 are accepted, so every logged time can be backed up.
pub fn parse_time(input: &str, now: Timestamp) -> anyhow::Result<Timestamp> {
    let ts = parse_any(input, now)?;
    anyhow::ensure!(
        is_representable(ts),
        "time {:?} is outside years 0000 to 9999",
        input.trim()
    );
    Ok(ts)
}

fn parse_any(input: &str, now: Timestamp) -> anyhow::Result<Timestamp> {
    let s = input.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(now);
    }
    if let Ok(ms) = s.parse::<i64>() {
        return Ok(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }
    for fmt in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp_millis())
                .ok_or_else(|| anyhow::anyhow!("{s:?} does not exist in the local time zone"));
        }
    }
    anyhow::bail!(
        "cannot parse time {s:?}: use epoch ms, RFC 3339, or YYYY-MM-DD HH:MM[:SS]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_now_and_epoch_ms() {
        assert_eq!(parse_time("now", 42).unwrap(), 42);
        assert_eq!(parse_time(" 1700000000123 ", 0).unwrap(), 1_700_000_000_123);
    }

    #[test]
    fn parses_rfc3339() {
        assert_eq!(
            parse_time("2023-11-14T22:13:20.123Z", 0).unwrap(),
            1_700_000_000_123
        );
        assert_eq!(parse_time("1970-01-01T01:00:00+01:00", 0).unwrap(), 0);
    }

    #[test]
    fn parses_local_datetime_consistently_with_display() {
        let ts = parse_time("2024-03-10 12:30", 0).unwrap();
        assert_eq!(long(ts), "2024-03-10 12:30:00");
    }

    #[test]
    fn rejects_years_outside_four_digits() {
        use fastlog_core::{MAX_TIMESTAMP, MIN_TIMESTAMP};
        assert_eq!(
            parse_time(&MIN_TIMESTAMP.to_string(), 0).unwrap(),
            MIN_TIMESTAMP
        );
        assert_eq!(
            parse_time(&MAX_TIMESTAMP.to_string(), 0).unwrap(),
            MAX_TIMESTAMP
        );
        assert!(parse_time(&(MIN_TIMESTAMP - 1).to_string(), 0).is_err());
        assert!(parse_time(&(MAX_TIMESTAMP + 1).to_string(), 0).is_err());
        assert!(parse_time("-9223372036854775808", 0).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_time("tomorrow-ish", 0).is_err());
    }
}
