use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// An event log. Ordering-dependent operations expect it sorted ascending by `ts`.
pub type EventLog = Vec<Event>;

pub const SECOND_MS: i64 = 1000;
pub const MINUTE_MS: i64 = 60 * SECOND_MS;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;

/// `0000-01-01T00:00:00.000Z`, the earliest instant with a four-digit year.
pub const MIN_TIMESTAMP: Timestamp = -62_167_219_200_000;
/// `9999-12-31T23:59:59.999Z`, the latest instant with a four-digit year.
pub const MAX_TIMESTAMP: Timestamp = 253_402_300_799_999;

/// Whether `ts` can be written as an RFC 3339 timestamp and read back.
pub fn is_representable(ts: Timestamp) -> bool {
    (MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&ts)
}

/// Number of decorated events shown in the recent-history view.
pub const ENTRIES_TO_SHOW: usize = 10;

/// Default fasting window, in hours.
pub const DEFAULT_FAST_HOURS: u32 = 16;
/// Default eating window, in hours.
pub const DEFAULT_EAT_HOURS: u32 = 8;

/// The state declared by an event.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Fasting,
    Eating,
}

impl Phase {
    /// The opposite phase.
    pub fn toggle(self) -> Self {
        match self {
            Self::Fasting => Self::Eating,
            Self::Eating => Self::Fasting,
        }
    }

    /// Position in the interval table: fasting is 0, eating is 1.
    pub fn index(self) -> usize {
        match self {
            Self::Fasting => 0,
            Self::Eating => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fasting => "fasting",
            Self::Eating => "eating",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fasting" | "fast" => Ok(Self::Fasting),
            "eating" | "eat" => Ok(Self::Eating),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

/// A user-declared transition into `start` at `ts`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Event {
    pub ts: Timestamp,
    pub start: Phase,
}

impl Event {
    pub fn new(ts: Timestamp, start: Phase) -> Self {
        Self { ts, start }
    }
}

/// Construct an event. Pure.
pub fn make_event(ts: Timestamp, start: Phase) -> Event {
    Event::new(ts, start)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    #[error("{phase} window must be longer than zero")]
    ZeroDuration { phase: Phase },
    #[error("{phase} window of {hours}h is too large")]
    TooLarge { phase: Phase, hours: u32 },
}

/// Target durations for the two phases, in milliseconds.
///
/// Each entry is how long the phase is expected to last before the opposite
/// phase should begin. Fixed for the lifetime of a process.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalConfig {
    pub fasting_ms: i64,
    pub eating_ms: i64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            fasting_ms: i64::from(DEFAULT_FAST_HOURS) * HOUR_MS,
            eating_ms: i64::from(DEFAULT_EAT_HOURS) * HOUR_MS,
        }
    }
}

impl IntervalConfig {
    /// Longest window accepted for either phase (one year).
    pub const MAX_HOURS: u32 = 24 * 366;

    pub fn from_hours(fast_hours: u32, eat_hours: u32) -> Result<Self, IntervalError> {
        for (phase, hours) in [(Phase::Fasting, fast_hours), (Phase::Eating, eat_hours)] {
            if hours == 0 {
                return Err(IntervalError::ZeroDuration { phase });
            }
            if hours > Self::MAX_HOURS {
                return Err(IntervalError::TooLarge { phase, hours });
            }
        }
        Ok(Self {
            fasting_ms: i64::from(fast_hours) * HOUR_MS,
            eating_ms: i64::from(eat_hours) * HOUR_MS,
        })
    }

    /// Expected duration of `phase` before the switch to the opposite phase.
    pub fn duration_for(&self, phase: Phase) -> i64 {
        self.as_table()[phase.index()]
    }

    /// The `[fasting, eating]` table.
    pub fn as_table(&self) -> [i64; 2] {
        [self.fasting_ms, self.eating_ms]
    }

    pub fn fast_hours(&self) -> f64 {
        self.fasting_ms as f64 / HOUR_MS as f64
    }

    pub fn eat_hours(&self) -> f64 {
        self.eating_ms as f64 / HOUR_MS as f64
    }
}
