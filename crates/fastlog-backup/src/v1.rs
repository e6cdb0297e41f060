use crate::{BackupCodec, BackupError};
use fastlog_core::format::{from_datetime, to_datetime};
use fastlog_core::{is_representable, Event, EventLog, Phase, Timestamp};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

const VERSION: u32 = 1;

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-01T08:30:00.000Z`.
const ISO_MILLIS: &str =
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z";

#[derive(Serialize)]
struct Document<'a> {
    version: u32,
    events: Vec<BackupEvent<'a>>,
}

#[derive(Serialize)]
struct BackupEvent<'a> {
    ts: String,
    start: &'a Phase,
}

#[derive(Deserialize)]
struct RestoredDocument {
    events: Vec<RestoredEvent>,
}

#[derive(Deserialize)]
struct RestoredEvent {
    ts: String,
    start: Phase,
}

/// Version 1 format: `{"version": 1, "events": [{"ts": "<ISO-8601>", "start": "fasting"}]}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BackupV1;

impl BackupV1 {
    pub fn new() -> Self {
        Self
    }
}

fn iso_timestamp(ts: Timestamp) -> Result<String, BackupError> {
    let invalid = || BackupError::Timestamp {
        value: ts.to_string(),
    };
    if !is_representable(ts) {
        return Err(invalid());
    }
    let dt = to_datetime(ts, UtcOffset::UTC).ok_or_else(invalid)?;
    let items = time::format_description::parse(ISO_MILLIS).map_err(|_| invalid())?;
    dt.format(&items).map_err(|_| invalid())
}

fn parse_timestamp(value: &str) -> Result<Timestamp, BackupError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .ok()
        .map(from_datetime)
        .filter(|ts| is_representable(*ts))
        .ok_or_else(|| BackupError::Timestamp {
            value: value.to_string(),
        })
}

impl BackupCodec for BackupV1 {
    fn version(&self) -> u32 {
        VERSION
    }

    fn backup(&self, log: &[Event]) -> Result<String, BackupError> {
        let events = log
            .iter()
            .map(|e| -> Result<BackupEvent, BackupError> {
                Ok(BackupEvent {
                    ts: iso_timestamp(e.ts)?,
                    start: &e.start,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let doc = Document {
            version: VERSION,
            events,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    fn restore(&self, text: &str) -> Result<EventLog, BackupError> {
        let doc: serde_json::Value = serde_json::from_str(text)?;
        let version = doc.get("version").cloned().unwrap_or(serde_json::Value::Null);
        if version.as_u64() != Some(u64::from(VERSION)) {
            return Err(BackupError::VersionMismatch {
                expected: VERSION,
                found: version.to_string(),
            });
        }
        let restored: RestoredDocument = serde_json::from_value(doc)?;
        restored
            .events
            .into_iter()
            .map(|e| -> Result<Event, BackupError> {
                Ok(Event::new(parse_timestamp(&e.ts)?, e.start))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastlog_core::make_event;

    fn sample() -> Vec<Event> {
        vec![
            make_event(1_700_000_000_123, Phase::Fasting),
            make_event(1_700_057_600_123, Phase::Eating),
        ]
    }

    #[test]
    fn backup_shape() {
        let text = BackupV1.backup(&sample()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["version"], 1);
        assert_eq!(v["events"][0]["ts"], "2023-11-14T22:13:20.123Z");
        assert_eq!(v["events"][0]["start"], "fasting");
        assert_eq!(v["events"][1]["start"], "eating");
    }

    #[test]
    fn restore_inverts_backup() {
        let log = sample();
        let text = BackupV1.backup(&log).unwrap();
        assert_eq!(BackupV1.restore(&text).unwrap(), log);
    }

    #[test]
    fn restore_accepts_offsets_and_no_fraction() {
        let text = r#"{"version":1,"events":[{"ts":"1970-01-01T02:00:01+02:00","start":"eating"}]}"#;
        let log = BackupV1.restore(text).unwrap();
        assert_eq!(log, vec![make_event(1_000, Phase::Eating)]);
    }

    #[test]
    fn restore_rejects_wrong_version() {
        for text in [
            r#"{"version":2,"events":[]}"#,
            r#"{"version":"1","events":[]}"#,
            r#"{"events":[]}"#,
        ] {
            let err = BackupV1.restore(text).unwrap_err();
            assert!(matches!(err, BackupError::VersionMismatch { .. }), "{text}");
        }
    }

    #[test]
    fn restore_rejects_garbage() {
        assert!(matches!(
            BackupV1.restore("not json"),
            Err(BackupError::Json(_))
        ));
        let bad_ts = r#"{"version":1,"events":[{"ts":"yesterday","start":"eating"}]}"#;
        assert!(matches!(
            BackupV1.restore(bad_ts),
            Err(BackupError::Timestamp { .. })
        ));
        let bad_phase = r#"{"version":1,"events":[{"ts":"1970-01-01T00:00:00Z","start":"napping"}]}"#;
        assert!(matches!(
            BackupV1.restore(bad_phase),
            Err(BackupError::Json(_))
        ));
    }

    #[test]
    fn restore_requires_events() {
        for text in [r#"{"version":1}"#, r#"{"version":1,"events":null}"#] {
            let err = BackupV1.restore(text).unwrap_err();
            assert!(matches!(err, BackupError::Json(_)), "{text}");
        }
    }

    #[test]
    fn four_digit_year_bounds_round_trip() {
        use fastlog_core::{MAX_TIMESTAMP, MIN_TIMESTAMP};
        let log = vec![
            make_event(MIN_TIMESTAMP, Phase::Fasting),
            make_event(MAX_TIMESTAMP, Phase::Eating),
        ];
        let text = BackupV1.backup(&log).unwrap();
        assert!(text.contains("0000-01-01T00:00:00.000Z"));
        assert!(text.contains("9999-12-31T23:59:59.999Z"));
        assert_eq!(BackupV1.restore(&text).unwrap(), log);
    }

    #[test]
    fn backup_refuses_unwritable_years() {
        for ts in [-62_200_000_000_000, 999_999_999_999_999] {
            let err = BackupV1
                .backup(&[make_event(ts, Phase::Fasting)])
                .unwrap_err();
            assert!(matches!(err, BackupError::Timestamp { .. }), "{ts}");
        }
    }

    #[test]
    fn restore_rejects_offset_pushing_year_below_zero() {
        let text = r#"{"version":1,"events":[{"ts":"0000-01-01T00:00:00+01:00","start":"eating"}]}"#;
        assert!(matches!(
            BackupV1.restore(text),
            Err(BackupError::Timestamp { .. })
        ));
    }

    #[test]
    fn restore_keeps_file_order() {
        let text = r#"{"version":1,"events":[
            {"ts":"1970-01-01T00:00:02.000Z","start":"eating"},
            {"ts":"1970-01-01T00:00:01.000Z","start":"fasting"}]}"#;
        let log = BackupV1.restore(text).unwrap();
        assert_eq!(log[0].ts, 2_000);
        assert_eq!(log[1].ts, 1_000);
    }

    #[test]
    fn empty_log_round_trips() {
        let text = BackupV1.backup(&[]).unwrap();
        assert!(BackupV1.restore(&text).unwrap().is_empty());
    }
}
