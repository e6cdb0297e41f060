use crate::paths::StorePaths;
use crate::StoreError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};

/// Exclusive store lock backed by `<root>/LOCK`.
/// Held for one load-modify-save cycle; released when dropped.
pub struct StoreLock {
    _file: File,
}

impl StoreLock {
    /// Block until the lock is acquired.
    pub fn acquire(paths: &StorePaths) -> Result<Self, StoreError> {
        let file = Self::open(paths)?;
        file.lock_exclusive()
            .map_err(|e| StoreError::unavailable(&paths.lock_file, e))?;
        Ok(Self { _file: file })
    }

    /// Acquire without waiting. Fails if another process holds the lock.
    pub fn try_acquire(paths: &StorePaths) -> Result<Self, StoreError> {
        let file = Self::open(paths)?;
        file.try_lock_exclusive()
            .map_err(|e| StoreError::unavailable(&paths.lock_file, e))?;
        Ok(Self { _file: file })
    }

    fn open(paths: &StorePaths) -> Result<File, StoreError> {
        if let Some(parent) = paths.lock_file.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::unavailable(parent, e))?;
        }
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&paths.lock_file)
            .map_err(|e| StoreError::unavailable(&paths.lock_file, e))
    }
}
