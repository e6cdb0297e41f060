use std::path::{Path, PathBuf};

/// Environment variable that overrides the store root.
pub const HOME_ENV: &str = "FASTLOG_HOME";

/// Return the per-user store root.
///
/// `$FASTLOG_HOME` if set, else `<data dir>/fastlog` (falls back to `~/.fastlog`).
pub fn store_root() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        PathBuf::from(home)
    } else if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("fastlog")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".fastlog")
    } else {
        PathBuf::from(".fastlog-store")
    }
}

/// All well-known paths under a store root.
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub root: PathBuf,
    pub log_json: PathBuf,
    pub config_json: PathBuf,
    pub lock_file: PathBuf,
    pub backups_dir: PathBuf,
}

impl StorePaths {
    /// Derive all paths from a root. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            log_json: root.join("log.json"),
            config_json: root.join("config.json"),
            lock_file: root.join("LOCK"),
            backups_dir: root.join("backups"),
            root,
        }
    }

    /// Paths under [`store_root`].
    pub fn default_location() -> Self {
        Self::discover(store_root())
    }

    /// Create all required directories. Idempotent.
    pub fn ensure_layout(&self) -> anyhow::Result<()> {
        for dir in [&self.root, &self.backups_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.log_json.is_file()
    }

    /// Timestamped file name for a backup written into `backups_dir`.
    pub fn backup_file(&self, stamp: &str) -> PathBuf {
        self.backups_dir.join(format!("fastlog-{stamp}.json"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_builds_correct_paths() {
        let p = StorePaths::discover("/tmp/fl");
        assert_eq!(p.log_json, PathBuf::from("/tmp/fl/log.json"));
        assert_eq!(p.config_json, PathBuf::from("/tmp/fl/config.json"));
        assert_eq!(p.lock_file, PathBuf::from("/tmp/fl/LOCK"));
        assert_eq!(p.backups_dir, PathBuf::from("/tmp/fl/backups"));
        assert_eq!(
            p.backup_file("20240101"),
            PathBuf::from("/tmp/fl/backups/fastlog-20240101.json")
        );
    }

    #[test]
    fn ensure_layout_creates_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let p = StorePaths::discover(tmp.path().join("store"));
        assert!(!p.is_initialized());
        p.ensure_layout().unwrap();
        assert!(p.root.is_dir());
        assert!(p.backups_dir.is_dir());
    }

    #[test]
    fn store_root_is_not_empty() {
        assert!(!store_root().as_os_str().is_empty());
    }
}
