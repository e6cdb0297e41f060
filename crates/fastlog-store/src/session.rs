//! One logical writer over a [`LogStorage`].
//!
//! Every mutation is a full read-modify-write: take the storage lock, load,
//! apply a pure transform from `fastlog_core::mutate`, save, then re-derive the
//! cached [`Snapshot`]. Mutating methods take `&mut self`, so calls on a
//! session are serialised; the storage lock covers other processes.

use crate::storage::LogStorage;
use fastlog_backup::BackupCodec;
use fastlog_core::{
    mutate, needs_confirmation, sort_log, target_event, Event, EventLog, IntervalConfig, Mutation, Outcome,
    Phase, Progress, Snapshot, Timestamp,
};

/// Result of a log-event-now request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
    Logged(Event),
    /// The confirmation prompt was declined; nothing was written.
    Declined,
    /// The log changed while the prompt was open; nothing was written.
    Changed,
}

pub struct Session<S: LogStorage> {
    storage: S,
    config: IntervalConfig,
    snapshot: Snapshot,
}

impl<S: LogStorage> Session<S> {
    /// Load the log once and derive the initial snapshot at `now`.
    pub fn open(storage: S, config: IntervalConfig, now: Timestamp) -> anyhow::Result<Self> {
        let log = load_sorted(&storage)?;
        let snapshot = Snapshot::derive(&log, now, &config);
        Ok(Self {
            storage,
            config,
            snapshot,
        })
    }

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Snapshot derived at the last load or mutation.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Progress at `now` from the cached snapshot. Does not touch storage.
    pub fn tick(&self, now: Timestamp) -> Option<Progress> {
        self.snapshot.progress_at(now)
    }

    /// Current log, sorted ascending.
    pub fn load(&self) -> anyhow::Result<EventLog> {
        load_sorted(&self.storage)
    }

    /// Reload from storage and re-derive the snapshot.
    pub fn refresh(&mut self, now: Timestamp) -> anyhow::Result<EventLog> {
        let log = self.load()?;
        self.snapshot = Snapshot::derive(&log, now, &self.config);
        Ok(log)
    }

    fn apply<F>(&mut self, now: Timestamp, op: &str, f: F) -> anyhow::Result<Mutation>
    where
        F: FnOnce(&[Event]) -> Option<Mutation>,
    {
        let _lock = self.storage.lock()?;
        let log = load_sorted(&self.storage)?;
        let Some(mutation) = f(&log) else {
            self.snapshot = Snapshot::derive(&log, now, &self.config);
            return Ok(Mutation {
                log,
                outcome: Outcome::NotFound,
                affected: 0,
            });
        };
        match mutation.outcome {
            Outcome::Applied => {
                self.storage.update(&mutation.log)?;
                tracing::info!(op, affected = mutation.affected, events = mutation.log.len(), "log updated");
            }
            Outcome::NotFound => {
                tracing::warn!(op, "no matching event, log left unchanged");
            }
        }
        self.snapshot = Snapshot::derive(&mutation.log, now, &self.config);
        Ok(mutation)
    }

    /// Log a transition at `ts` and re-derive the snapshot at `now`.
    ///
    /// When this would break a fast early, `confirm` is asked with the projected
    /// progress before the storage lock is taken. Declining leaves the log
    /// untouched. If another writer moved the target while the question was
    /// open, nothing is written and [`LogOutcome::Changed`] is returned.
    pub fn log_event<C>(
        &mut self,
        ts: Timestamp,
        phase: Option<Phase>,
        now: Timestamp,
        confirm: C,
    ) -> anyhow::Result<LogOutcome>
    where
        C: FnOnce(&Progress) -> bool,
    {
        let config = self.config;
        let before = self.load()?;
        let confirmed_target = if needs_confirmation(&before, ts, &config) {
            let snapshot = Snapshot::derive(&before, ts, &config);
            if let Some(p) = snapshot.progress_at(ts) {
                if !confirm(&p) {
                    tracing::info!("log event declined");
                    self.snapshot = Snapshot::derive(&before, now, &config);
                    return Ok(LogOutcome::Declined);
                }
            }
            snapshot.target
        } else {
            None
        };

        let mut changed = false;
        let mutation = self.apply(now, "append", |log| {
            if needs_confirmation(log, ts, &config)
                && target_event(log, ts, &config) != confirmed_target
            {
                changed = true;
                return None;
            }
            Some(mutate::append(log, ts, phase))
        })?;
        if changed {
            tracing::warn!(ts, "log changed while awaiting confirmation, nothing written");
            return Ok(LogOutcome::Changed);
        }
        let event = mutation
            .log
            .iter()
            .rev()
            .find(|e| e.ts == ts)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("appended event at {ts} missing from log"))?;
        Ok(LogOutcome::Logged(event))
    }

    pub fn reschedule(
        &mut self,
        target_ts: Timestamp,
        new_ts: Timestamp,
        now: Timestamp,
    ) -> anyhow::Result<Mutation> {
        self.apply(now, "reschedule", |log| {
            Some(mutate::reschedule(log, target_ts, new_ts))
        })
    }

    pub fn delete(&mut self, ts: Timestamp, now: Timestamp) -> anyhow::Result<Mutation> {
        self.apply(now, "delete", |log| Some(mutate::delete(log, ts)))
    }

    /// Decode `text` with `codec` and replace the log (or merge into it).
    ///
    /// A decode failure aborts before storage is touched.
    pub fn restore(
        &mut self,
        codec: &dyn BackupCodec,
        text: &str,
        merge: bool,
        now: Timestamp,
    ) -> anyhow::Result<Mutation> {
        let incoming = codec.restore(text)?;
        let op = if merge { "merge" } else { "restore" };
        self.apply(now, op, |log| {
            Some(if merge {
                mutate::merge(log, &incoming)
            } else {
                mutate::restore(incoming)
            })
        })
    }

    pub fn backup(&self, codec: &dyn BackupCodec) -> anyhow::Result<String> {
        let log = self.load()?;
        Ok(codec.backup(&log)?)
    }
}

fn load_sorted<S: LogStorage>(storage: &S) -> anyhow::Result<EventLog> {
    let mut log = storage.load()?;
    sort_log(&mut log);
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::StoreLock;
    use crate::paths::StorePaths;
    use crate::storage::{FileStorage, MemoryStorage};
    use fastlog_backup::BackupV1;
    use fastlog_core::{make_event, HOUR_MS};

    fn session(log: EventLog) -> Session<MemoryStorage> {
        Session::open(MemoryStorage::with_log(log), IntervalConfig::default(), 0).unwrap()
    }

    #[test]
    fn first_event_is_fasting() {
        let mut s = session(Vec::new());
        let out = s.log_event(1000, None, 1000, |_| true).unwrap();
        assert_eq!(out, LogOutcome::Logged(make_event(1000, Phase::Fasting)));
        assert_eq!(s.load().unwrap(), vec![make_event(1000, Phase::Fasting)]);
        assert_eq!(s.snapshot().state, Phase::Fasting);
    }

    #[test]
    fn breaking_fast_early_asks_and_can_be_declined() {
        let mut s = session(vec![make_event(0, Phase::Fasting)]);
        let mut asked = false;
        let out = s
            .log_event(HOUR_MS, None, HOUR_MS, |p| {
                asked = true;
                assert_eq!(p.ms_remaining, 15 * HOUR_MS);
                false
            })
            .unwrap();
        assert!(asked);
        assert_eq!(out, LogOutcome::Declined);
        assert_eq!(s.load().unwrap().len(), 1);
    }

    #[test]
    fn confirmation_is_asked_without_the_store_lock() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = StorePaths::discover(tmp.path());
        let storage = FileStorage::new(paths.clone());
        storage.update(&[make_event(0, Phase::Fasting)]).unwrap();
        let mut s = Session::open(storage, IntervalConfig::default(), 0).unwrap();

        let out = s
            .log_event(HOUR_MS, None, HOUR_MS, |_| {
                assert!(StoreLock::try_acquire(&paths).is_ok());
                true
            })
            .unwrap();
        assert_eq!(out, LogOutcome::Logged(make_event(HOUR_MS, Phase::Eating)));
    }

    #[test]
    fn log_changed_during_confirmation_writes_nothing() {
        let storage = MemoryStorage::with_log(vec![make_event(0, Phase::Fasting)]);
        let mut s = Session::open(&storage, IntervalConfig::default(), 0).unwrap();
        let out = s
            .log_event(2 * HOUR_MS, None, 2 * HOUR_MS, |_| {
                // Another writer starts a fresh fast in the meantime.
                storage
                    .update(&[
                        make_event(0, Phase::Fasting),
                        make_event(HOUR_MS / 2, Phase::Eating),
                        make_event(HOUR_MS, Phase::Fasting),
                    ])
                    .unwrap();
                true
            })
            .unwrap();
        assert_eq!(out, LogOutcome::Changed);
        assert_eq!(storage.load().unwrap().len(), 3);
    }

    #[test]
    fn backdated_event_keeps_snapshot_at_wall_clock() {
        let mut s = session(vec![make_event(0, Phase::Fasting)]);
        s.log_event(16 * HOUR_MS, None, 30 * HOUR_MS, |_| true)
            .unwrap();
        let snap = s.snapshot();
        assert_eq!(snap.derived_at, 30 * HOUR_MS);
        assert_eq!(snap.target, Some(make_event(24 * HOUR_MS, Phase::Fasting)));
        assert!(s.tick(snap.derived_at).unwrap().overrun);
    }

    #[test]
    fn completed_fast_does_not_ask() {
        let mut s = session(vec![make_event(0, Phase::Fasting)]);
        let out = s
            .log_event(16 * HOUR_MS, None, 16 * HOUR_MS, |_| panic!("should not ask"))
            .unwrap();
        assert_eq!(
            out,
            LogOutcome::Logged(make_event(16 * HOUR_MS, Phase::Eating))
        );
        assert_eq!(s.snapshot().state, Phase::Eating);
        assert_eq!(
            s.snapshot().target,
            Some(make_event(24 * HOUR_MS, Phase::Fasting))
        );
    }

    #[test]
    fn tick_uses_cached_snapshot() {
        let storage = MemoryStorage::with_log(vec![make_event(0, Phase::Fasting)]);
        let s = Session::open(&storage, IntervalConfig::default(), 0).unwrap();
        // Change storage behind the session's back; ticks must not see it.
        storage.update(&[]).unwrap();
        let p = s.tick(8 * HOUR_MS).unwrap();
        assert_eq!(p.percent, 50);
    }

    #[test]
    fn reschedule_and_delete_not_found_are_no_ops() {
        let log = vec![make_event(100, Phase::Fasting)];
        let mut s = session(log.clone());
        let m = s.reschedule(5, 6, 200).unwrap();
        assert_eq!(m.outcome, Outcome::NotFound);
        let m = s.delete(5, 200).unwrap();
        assert_eq!(m.outcome, Outcome::NotFound);
        assert_eq!(s.load().unwrap(), log);
    }

    #[test]
    fn reschedule_persists_sorted() {
        let mut s = session(vec![
            make_event(100, Phase::Fasting),
            make_event(200, Phase::Eating),
        ]);
        s.reschedule(200, 50, 300).unwrap();
        let log = s.load().unwrap();
        assert_eq!(log[0], make_event(50, Phase::Eating));
        assert_eq!(s.snapshot().state, Phase::Fasting);
    }

    #[test]
    fn restore_with_wrong_version_leaves_log() {
        let log = vec![make_event(100, Phase::Fasting)];
        let mut s = session(log.clone());
        assert!(s
            .restore(&BackupV1, r#"{"version":3,"events":[]}"#, false, 0)
            .is_err());
        assert_eq!(s.load().unwrap(), log);
    }

    #[test]
    fn restore_without_events_leaves_log() {
        let log = vec![
            make_event(100, Phase::Fasting),
            make_event(200, Phase::Eating),
        ];
        let mut s = session(log.clone());
        for merge in [false, true] {
            assert!(s.restore(&BackupV1, r#"{"version":1}"#, merge, 0).is_err());
        }
        assert_eq!(s.load().unwrap(), log);
    }

    #[test]
    fn backup_restore_round_trip_and_merge() {
        let mut s = session(vec![
            make_event(100, Phase::Fasting),
            make_event(200, Phase::Eating),
        ]);
        let text = s.backup(&BackupV1).unwrap();
        s.delete(200, 300).unwrap();
        s.log_event(400, Some(Phase::Fasting), 400, |_| true).unwrap();

        let m = s.restore(&BackupV1, &text, true, 500).unwrap();
        assert_eq!(m.affected, 1);
        let ts: Vec<_> = s.load().unwrap().iter().map(|e| e.ts).collect();
        assert_eq!(ts, vec![100, 200, 400]);

        s.restore(&BackupV1, &text, false, 500).unwrap();
        assert_eq!(s.load().unwrap().len(), 2);
    }

    #[test]
    fn file_backed_session_persists_between_opens() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = StorePaths::discover(tmp.path());
        {
            let mut s =
                Session::open(FileStorage::new(paths.clone()), IntervalConfig::default(), 0)
                    .unwrap();
            s.log_event(1_000, None, 1_000, |_| true).unwrap();
            s.log_event(20 * HOUR_MS, None, 20 * HOUR_MS, |_| true).unwrap();
        }
        let s = Session::open(
            FileStorage::new(paths),
            IntervalConfig::default(),
            21 * HOUR_MS,
        )
        .unwrap();
        let log = s.load().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].start, Phase::Eating);
        assert_eq!(s.snapshot().state, Phase::Eating);
    }
}
