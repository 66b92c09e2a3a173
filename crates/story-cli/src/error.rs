//! Error types for story-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end the process with exit code 1
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from story-core
    #[error(transparent)]
    Core(#[from] story_core::Error),

    /// Error from story-ledger
    #[error(transparent)]
    Ledger(#[from] story_ledger::Error),

    /// Error from story-meta
    #[error(transparent)]
    Meta(#[from] story_meta::Error),

    /// Error from story-fs
    #[error(transparent)]
    Fs(#[from] story_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
