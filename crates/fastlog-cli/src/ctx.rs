use fastlog_core::{IntervalConfig, Timestamp};
use fastlog_store::{interval_config, FileStorage, Session, StorePaths};
use std::path::PathBuf;

/// Store location and the interval, resolved once at startup.
pub struct Ctx {
    pub paths: StorePaths,
    pub config: IntervalConfig,
}

impl Ctx {
    pub fn load(
        store: Option<PathBuf>,
        fast_hours: Option<u32>,
        eat_hours: Option<u32>,
    ) -> anyhow::Result<Self> {
        let paths = match store {
            Some(root) => StorePaths::discover(root),
            None => StorePaths::default_location(),
        };
        let config = interval_config(&paths.config_json, fast_hours, eat_hours)?;
        tracing::debug!(
            root = %paths.root.display(),
            fast_ms = config.fasting_ms,
            eat_ms = config.eating_ms,
            "resolved store"
        );
        Ok(Self { paths, config })
    }

    pub fn session(&self, now: Timestamp) -> anyhow::Result<Session<FileStorage>> {
        Session::open(FileStorage::new(self.paths.clone()), self.config, now)
    }
}
