//! State derivation: last event, current phase, projected next transition,
//! and progress towards it.
//!
//! All functions are pure. The log must be sorted ascending by timestamp;
//! see [`is_chronological`].

use crate::types::{Event, IntervalConfig, Phase, Timestamp};
use serde::Serialize;

/// Phase assumed before any event has been logged.
pub const DEFAULT_PHASE: Phase = Phase::Eating;

/// True when `log` is sorted ascending by timestamp (ties allowed).
pub fn is_chronological(log: &[Event]) -> bool {
    log.windows(2).all(|w| w[0].ts <= w[1].ts)
}

/// Return the event that starts the phase active at `now`, or `None` when no
/// event has happened yet.
///
/// The log is treated as if prefixed by a sentinel eating event at negative
/// infinity. Scanning backwards, an event is accepted when both it and the
/// event before it (the sentinel, for the first entry) are at or before `now`.
pub fn find_last_event(log: &[Event], now: Timestamp) -> Option<Event> {
    debug_assert!(is_chronological(log), "event log must be sorted by ts");
    for i in (0..log.len()).rev() {
        let prev_ts = if i == 0 { Timestamp::MIN } else { log[i - 1].ts };
        if log[i].ts <= now && prev_ts <= now {
            return Some(log[i]);
        }
    }
    None
}

/// Phase in effect at `now`. Eating when nothing has been logged yet.
pub fn current_state(log: &[Event], now: Timestamp) -> Phase {
    find_last_event(log, now)
        .map(|e| e.start)
        .unwrap_or(DEFAULT_PHASE)
}

/// Project the next transition from the last event at `now`.
///
/// This is a projection only: it does not check whether such an event exists.
pub fn target_event(log: &[Event], now: Timestamp, config: &IntervalConfig) -> Option<Event> {
    find_last_event(log, now).map(|last| target_after(&last, config))
}

/// The transition expected to follow `last`.
pub fn target_after(last: &Event, config: &IntervalConfig) -> Event {
    Event::new(
        last.ts.saturating_add(config.duration_for(last.start)),
        last.start.toggle(),
    )
}

/// True when logging at `now` would break a fast before its target.
pub fn needs_confirmation(log: &[Event], now: Timestamp, config: &IntervalConfig) -> bool {
    match target_event(log, now, config) {
        Some(target) => target.ts > now && target.start == Phase::Eating,
        None => false,
    }
}

/// Progress towards a target transition at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Phase being waited out (the one the target switches away from).
    pub phase: Phase,
    pub target: Event,
    pub ms_remaining: i64,
    pub total_ms: i64,
    /// Elapsed share of the phase, capped at 100. Negative only when the
    /// target lies further out than one full window.
    pub percent: i64,
    /// Set once `ms_remaining <= 0`.
    pub overrun: bool,
    pub overrun_ms: i64,
}

impl Progress {
    /// When the phase being waited out began, according to the configuration.
    pub fn phase_started_at(&self) -> Timestamp {
        self.target.ts.saturating_sub(self.total_ms)
    }

    pub fn percent_remaining(&self) -> i64 {
        100 - self.percent
    }

    /// Milliseconds to display: overrun magnitude when overrun, remaining otherwise.
    pub fn display_ms(&self) -> i64 {
        if self.overrun {
            self.overrun_ms
        } else {
            self.ms_remaining
        }
    }
}

/// Compute progress towards `target` at `now`.
///
/// The duration basis is the window of the phase being waited out, i.e. the
/// opposite of `target.start`.
pub fn progress(target: &Event, now: Timestamp, config: &IntervalConfig) -> Progress {
    let phase = target.start.toggle();
    let total_ms = config.duration_for(phase).max(1);
    let ms_remaining = target.ts.saturating_sub(now);
    let consumed = ms_remaining.saturating_mul(100).div_euclid(total_ms);
    let percent = 100_i64.saturating_sub(consumed).min(100);
    let overrun = ms_remaining <= 0;
    Progress {
        phase,
        target: *target,
        ms_remaining,
        total_ms,
        percent,
        overrun,
        overrun_ms: if overrun { now.saturating_sub(target.ts) } else { 0 },
    }
}

/// Derived state for one instant, cached by presentation between mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub derived_at: Timestamp,
    pub state: Phase,
    pub last_event: Option<Event>,
    pub target: Option<Event>,
    pub config: IntervalConfig,
}

impl Snapshot {
    pub fn derive(log: &[Event], now: Timestamp, config: &IntervalConfig) -> Self {
        let last_event = find_last_event(log, now);
        Self {
            derived_at: now,
            state: last_event.map(|e| e.start).unwrap_or(DEFAULT_PHASE),
            last_event,
            target: last_event.map(|e| target_after(&e, config)),
            config: *config,
        }
    }

    /// Re-evaluate progress against the cached target without touching the log.
    pub fn progress_at(&self, now: Timestamp) -> Option<Progress> {
        self.target.map(|t| progress(&t, now, &self.config))
    }
}
