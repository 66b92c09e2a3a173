//! Error types for story-ledger

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Ledger not found at {path}")]
    LedgerNotFound { path: PathBuf },

    #[error("Filesystem error: {0}")]
    Fs(#[from] story_fs::Error),

    #[error("Backup of {path} failed: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: story_fs::Error,
    },
}
