pub mod config;
pub mod lock;
pub mod paths;
pub mod session;
pub mod storage;

pub use config::{interval_config, read_config, set_value, write_config, CONFIG_KEYS};
pub use lock::StoreLock;
pub use paths::{store_root, StorePaths};
pub use session::{LogOutcome, Session};
pub use storage::{write_atomic, FileStorage, LogStorage, MemoryStorage};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored log at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unavailable {
            path: path.into(),
            source,
        }
    }
}
