use crate::types::{Event, IntervalConfig, Phase, Timestamp};
use serde::{Deserialize, Serialize};

/// Outcome of a completed interval measured against its target.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SuccessState {
    Success,
    Failure,
    /// The first event has no preceding interval.
    #[default]
    None,
}

impl SuccessState {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Success => "+",
            Self::Failure => "-",
            Self::None => " ",
        }
    }
}

/// An event with the length of the interval that ended at it.
///
/// Computed on demand for display; never persisted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoratedEvent {
    #[serde(flatten)]
    pub event: Event,
    /// Milliseconds since the previous event (0 for the first).
    pub duration: i64,
    pub success_state: SuccessState,
}

/// Score the interval `[prev, next)` against the configuration.
///
/// A fast succeeds when it lasted at least its target; an eating window
/// succeeds when it lasted at most its target.
pub fn score_interval(prev: &Event, next: &Event, config: &IntervalConfig) -> SuccessState {
    let duration = next.ts.saturating_sub(prev.ts);
    let ok = match prev.start {
        Phase::Fasting => duration >= config.fasting_ms,
        Phase::Eating => duration <= config.eating_ms,
    };
    if ok {
        SuccessState::Success
    } else {
        SuccessState::Failure
    }
}

/// Annotate every event of a chronologically sorted log.
pub fn decorate_log(log: &[Event], config: &IntervalConfig) -> Vec<DecoratedEvent> {
    let mut out = Vec::with_capacity(log.len());
    for (i, event) in log.iter().enumerate() {
        let decorated = match i.checked_sub(1).map(|p| &log[p]) {
            None => DecoratedEvent {
                event: *event,
                duration: 0,
                success_state: SuccessState::None,
            },
            Some(prev) => DecoratedEvent {
                event: *event,
                duration: event.ts.saturating_sub(prev.ts),
                success_state: score_interval(prev, event, config),
            },
        };
        out.push(decorated);
    }
    out
}

/// The `n` most recent decorated events, newest first.
pub fn recent(decorated: &[DecoratedEvent], n: usize) -> Vec<DecoratedEvent> {
    decorated.iter().rev().take(n).copied().collect()
}

/// Aggregate adherence over a decorated log.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub fasts: usize,
    pub fasts_succeeded: usize,
    pub eating_windows: usize,
    pub eating_windows_succeeded: usize,
    pub longest_fast_ms: i64,
    pub longest_fast_started: Option<Timestamp>,
}

impl Stats {
    pub fn from_decorated(decorated: &[DecoratedEvent]) -> Self {
        let mut stats = Self::default();
        for pair in decorated.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            let ok = cur.success_state == SuccessState::Success;
            match prev.event.start {
                Phase::Fasting => {
                    stats.fasts += 1;
                    stats.fasts_succeeded += usize::from(ok);
                    if cur.duration > stats.longest_fast_ms {
                        stats.longest_fast_ms = cur.duration;
                        stats.longest_fast_started = Some(prev.event.ts);
                    }
                }
                Phase::Eating => {
                    stats.eating_windows += 1;
                    stats.eating_windows_succeeded += usize::from(ok);
                }
            }
        }
        stats
    }
}
