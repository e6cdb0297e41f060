//! Log mutations. Each takes a log by reference and returns a new log sorted
//! ascending by timestamp; persisting it is the caller's job.

use crate::engine::find_last_event;
use crate::types::{Event, EventLog, Phase, Timestamp};

/// Whether a mutation found something to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// No event matched the requested timestamp; the log is unchanged.
    NotFound,
}

/// A new log plus what happened producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub log: EventLog,
    pub outcome: Outcome,
    /// Number of events added, moved, or removed.
    pub affected: usize,
}

impl Mutation {
    fn applied(log: EventLog, affected: usize) -> Self {
        Self {
            log,
            outcome: Outcome::Applied,
            affected,
        }
    }

    fn not_found(log: EventLog) -> Self {
        Self {
            log,
            outcome: Outcome::NotFound,
            affected: 0,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.outcome == Outcome::Applied
    }
}

/// Stable sort by timestamp; equal timestamps keep their relative order.
pub fn sort_log(log: &mut EventLog) {
    log.sort_by_key(|e| e.ts);
}

fn sorted(mut log: EventLog) -> EventLog {
    sort_log(&mut log);
    log
}

/// Phase a new event at `ts` gets when none is given: the opposite of the
/// phase active at `ts`, or fasting when nothing precedes it.
pub fn next_phase(log: &[Event], ts: Timestamp) -> Phase {
    find_last_event(log, ts)
        .map(|last| last.start.toggle())
        .unwrap_or(Phase::Fasting)
}

/// Add an event at `ts`. Without an explicit phase it toggles from the phase
/// active at `ts`.
pub fn append(log: &[Event], ts: Timestamp, phase: Option<Phase>) -> Mutation {
    let start = phase.unwrap_or_else(|| next_phase(log, ts));
    let mut next = log.to_vec();
    next.push(Event::new(ts, start));
    Mutation::applied(sorted(next), 1)
}

/// Move the first event at exactly `target_ts` to `new_ts`.
pub fn reschedule(log: &[Event], target_ts: Timestamp, new_ts: Timestamp) -> Mutation {
    let mut next = log.to_vec();
    match next.iter_mut().find(|e| e.ts == target_ts) {
        Some(event) => {
            event.ts = new_ts;
            Mutation::applied(sorted(next), 1)
        }
        None => Mutation::not_found(sorted(next)),
    }
}

/// Remove every event at exactly `ts`.
pub fn delete(log: &[Event], ts: Timestamp) -> Mutation {
    let next: EventLog = log.iter().filter(|e| e.ts != ts).copied().collect();
    let removed = log.len() - next.len();
    if removed == 0 {
        Mutation::not_found(sorted(next))
    } else {
        Mutation::applied(sorted(next), removed)
    }
}

/// Replace the log wholesale with `incoming`.
pub fn restore(incoming: EventLog) -> Mutation {
    let n = incoming.len();
    Mutation::applied(sorted(incoming), n)
}

/// Union of `log` and `incoming`, dropping events identical in both `ts` and `start`.
pub fn merge(log: &[Event], incoming: &[Event]) -> Mutation {
    let mut next = log.to_vec();
    let mut added = 0;
    for event in incoming {
        if !next.contains(event) {
            next.push(*event);
            added += 1;
        }
    }
    Mutation::applied(sorted(next), added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::target_event;
    use crate::types::{make_event, IntervalConfig, HOUR_MS};

    #[test]
    fn append_to_empty_log_starts_fasting() {
        let m = append(&[], 1000, None);
        assert_eq!(m.log, vec![make_event(1000, Phase::Fasting)]);
        assert!(m.is_applied());
    }

    #[test]
    fn append_toggles_from_last_event() {
        let log = vec![make_event(0, Phase::Eating)];
        let m = append(&log, 16 * HOUR_MS, None);
        assert_eq!(
            m.log,
            vec![
                make_event(0, Phase::Eating),
                make_event(16 * HOUR_MS, Phase::Fasting)
            ]
        );
        assert_eq!(
            target_event(&m.log, 16 * HOUR_MS, &IntervalConfig::default()),
            Some(make_event(24 * HOUR_MS, Phase::Eating))
        );
    }

    #[test]
    fn append_with_explicit_phase() {
        let log = vec![make_event(0, Phase::Fasting)];
        let m = append(&log, 10, Some(Phase::Fasting));
        assert_eq!(m.log[1], make_event(10, Phase::Fasting));
    }

    #[test]
    fn append_in_the_past_is_sorted_and_toggles_from_that_time() {
        let log = vec![
            make_event(100, Phase::Fasting),
            make_event(300, Phase::Eating),
        ];
        let m = append(&log, 200, None);
        assert_eq!(m.log[1], make_event(200, Phase::Eating));
        assert_eq!(m.log[2].ts, 300);
    }

    #[test]
    fn reschedule_moves_and_resorts() {
        let log = vec![
            make_event(100, Phase::Fasting),
            make_event(200, Phase::Eating),
        ];
        let m = reschedule(&log, 100, 300);
        assert!(m.is_applied());
        assert_eq!(
            m.log,
            vec![
                make_event(200, Phase::Eating),
                make_event(300, Phase::Fasting)
            ]
        );
    }

    #[test]
    fn reschedule_missing_is_not_found() {
        let log = vec![make_event(100, Phase::Fasting)];
        let m = reschedule(&log, 999, 5);
        assert_eq!(m.outcome, Outcome::NotFound);
        assert_eq!(m.log, log);
    }

    #[test]
    fn reschedule_touches_first_duplicate_only() {
        let log = vec![
            make_event(100, Phase::Fasting),
            make_event(100, Phase::Eating),
        ];
        let m = reschedule(&log, 100, 50);
        assert_eq!(
            m.log,
            vec![
                make_event(50, Phase::Fasting),
                make_event(100, Phase::Eating)
            ]
        );
    }

    #[test]
    fn delete_removes_all_matches() {
        let log = vec![
            make_event(100, Phase::Fasting),
            make_event(100, Phase::Eating),
            make_event(200, Phase::Fasting),
        ];
        let m = delete(&log, 100);
        assert_eq!(m.affected, 2);
        assert_eq!(m.log, vec![make_event(200, Phase::Fasting)]);
    }

    #[test]
    fn delete_is_idempotent() {
        let log = vec![
            make_event(100, Phase::Fasting),
            make_event(200, Phase::Eating),
        ];
        let once = delete(&log, 100);
        let twice = delete(&once.log, 100);
        assert_eq!(once.log, twice.log);
        assert_eq!(twice.outcome, Outcome::NotFound);
    }

    #[test]
    fn restore_sorts_incoming() {
        let m = restore(vec![
            make_event(300, Phase::Eating),
            make_event(100, Phase::Fasting),
        ]);
        assert_eq!(m.log[0].ts, 100);
        assert_eq!(m.affected, 2);
    }

    #[test]
    fn merge_skips_exact_duplicates() {
        let log = vec![
            make_event(100, Phase::Fasting),
            make_event(200, Phase::Eating),
        ];
        let incoming = vec![
            make_event(200, Phase::Eating),
            make_event(150, Phase::Eating),
        ];
        let m = merge(&log, &incoming);
        assert_eq!(m.affected, 1);
        assert_eq!(
            m.log.iter().map(|e| e.ts).collect::<Vec<_>>(),
            vec![100, 150, 200]
        );
    }
}
