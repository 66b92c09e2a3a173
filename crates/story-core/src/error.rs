//! Error types for story-core

use std::path::PathBuf;

/// Result type for story-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run
///
/// Problems with individual story documents are not errors; they are
/// logged and reported alongside the results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Story directory missing or not a directory
    #[error("Story directory not found: {path}")]
    StoryDirNotFound { path: PathBuf },

    /// Unknown status name
    #[error("Unknown status: {value}")]
    UnknownStatus { value: String },

    /// Filesystem error from story-fs
    #[error(transparent)]
    Fs(#[from] story_fs::Error),

    /// Ledger error from story-ledger
    #[error(transparent)]
    Ledger(#[from] story_ledger::Error),

    /// Configuration error from story-meta
    #[error(transparent)]
    Meta(#[from] story_meta::Error),
}
