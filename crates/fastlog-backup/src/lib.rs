pub mod text;
pub mod v1;

pub use text::{format_event, format_log};
pub use v1::BackupV1;

use fastlog_core::{Event, EventLog};

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("incorrect backup version: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: String },
    #[error("malformed backup: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid timestamp in backup: {value}")]
    Timestamp { value: String },
}

/// Serialises an event log to portable text and back.
pub trait BackupCodec {
    /// Format version written by [`backup`](Self::backup).
    fn version(&self) -> u32;
    fn backup(&self, log: &[Event]) -> Result<String, BackupError>;
    fn restore(&self, text: &str) -> Result<EventLog, BackupError>;
}
