//! Default locations, relative to the base directory.

use std::path::Path;

/// Well-known paths used by the story tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryPath {
    /// Directory holding one markdown document per story
    StoryDir,
    /// The sprint status ledger
    SprintStatus,
    /// Directory receiving ledger backups before each fix run
    BackupDir,
    /// The `.storyline` configuration directory
    ConfigDir,
    /// `config.toml` inside the configuration directory
    ConfigFile,
}

impl StoryPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StoryDir => "_bmad-output/implementation-artifacts/sprint-artifacts",
            Self::SprintStatus => {
                "_bmad-output/implementation-artifacts/sprint-artifacts/sprint-status.yaml"
            }
            Self::BackupDir => ".sprint-status-backups",
            Self::ConfigDir => ".storyline",
            Self::ConfigFile => ".storyline/config.toml",
        }
    }
}

impl AsRef<Path> for StoryPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for StoryPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for StoryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
