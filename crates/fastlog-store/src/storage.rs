use crate::lock::StoreLock;
use crate::paths::StorePaths;
use crate::StoreError;
use fastlog_core::{Event, EventLog};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Durable home of the event log.
///
/// `load` returns an empty log when nothing has been persisted yet; any other
/// failure to reach the medium is reported as an error.
pub trait LogStorage {
    fn load(&self) -> Result<EventLog, StoreError>;
    fn update(&self, log: &[Event]) -> Result<(), StoreError>;

    /// Exclusive guard for one load-modify-save cycle. Backends that cannot be
    /// shared between processes return `None`.
    fn lock(&self) -> Result<Option<StoreLock>, StoreError> {
        Ok(None)
    }
}

impl<T: LogStorage + ?Sized> LogStorage for &T {
    fn load(&self) -> Result<EventLog, StoreError> {
        (**self).load()
    }

    fn update(&self, log: &[Event]) -> Result<(), StoreError> {
        (**self).update(log)
    }

    fn lock(&self) -> Result<Option<StoreLock>, StoreError> {
        (**self).lock()
    }
}

/// In-process storage. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    log: Mutex<EventLog>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: EventLog) -> Self {
        Self {
            log: Mutex::new(log),
        }
    }
}

impl LogStorage for MemoryStorage {
    fn load(&self) -> Result<EventLog, StoreError> {
        let guard = self.log.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn update(&self, log: &[Event]) -> Result<(), StoreError> {
        let mut guard = self.log.lock().unwrap_or_else(|e| e.into_inner());
        *guard = log.to_vec();
        Ok(())
    }
}

/// JSON document on disk (`<root>/log.json`), replaced atomically on update.
#[derive(Debug, Clone)]
pub struct FileStorage {
    paths: StorePaths,
}

impl FileStorage {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }
}

impl LogStorage for FileStorage {
    fn load(&self) -> Result<EventLog, StoreError> {
        let path = &self.paths.log_json;
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no stored log, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::unavailable(path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let log: EventLog = serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), events = log.len(), "loaded log");
        Ok(log)
    }

    fn update(&self, log: &[Event]) -> Result<(), StoreError> {
        let path = &self.paths.log_json;
        let json = serde_json::to_vec(log).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;
        write_atomic(path, &json).map_err(|e| StoreError::unavailable(path, e))?;
        tracing::debug!(path = %path.display(), events = log.len(), "saved log");
        Ok(())
    }

    fn lock(&self) -> Result<Option<StoreLock>, StoreError> {
        StoreLock::acquire(&self.paths).map(Some)
    }
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("no parent dir for {}", path.display()),
        )
    })?;
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
