//! Configuration types and loading for Storyline
//!
//! The configuration lives in `.storyline/config.toml` under the base
//! directory. Every section and field is optional:
//!
//! ```toml
//! [paths]
//! story_dir = "_bmad-output/implementation-artifacts/sprint-artifacts"
//! sprint_status = "_bmad-output/implementation-artifacts/sprint-artifacts/sprint-status.yaml"
//! backup_dir = ".sprint-status-backups"
//!
//! [validation]
//! min_file_size = 10240
//! recommended_size = 15360
//! max_repetitions = 3
//! min_tasks = 20
//! ```

use serde::{Deserialize, Serialize};
use story_fs::{NormalizedPath, StoryPath, io};

use crate::{Error, Result};

/// Configuration files larger than this are rejected outright.
pub const MAX_CONFIG_SIZE: u64 = 1024 * 1024;

/// Locations of the story documents, the ledger and its backups.
///
/// Relative values are resolved against the base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub story_dir: String,
    pub sprint_status: String,
    pub backup_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            story_dir: StoryPath::StoryDir.as_str().to_string(),
            sprint_status: StoryPath::SprintStatus.as_str().to_string(),
            backup_dir: StoryPath::BackupDir.as_str().to_string(),
        }
    }
}

/// Thresholds for story document validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Files smaller than this are critical findings (bytes)
    pub min_file_size: u64,
    /// Files smaller than this are warnings (bytes)
    pub recommended_size: u64,
    /// A paragraph repeated more often than this is suspicious
    pub max_repetitions: usize,
    /// Minimum number of task checkboxes
    pub min_tasks: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_file_size: 10 * 1024,
            recommended_size: 15 * 1024,
            max_repetitions: 3,
            min_tasks: 20,
        }
    }
}

/// Root configuration document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorylineConfig {
    pub paths: PathsConfig,
    pub validation: ValidationConfig,
}

impl StorylineConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(path: &NormalizedPath, content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::InvalidConfig {
            path: path.to_native(),
            message: e.to_string(),
        })?;
        config.check(path)?;
        Ok(config)
    }

    fn check(&self, path: &NormalizedPath) -> Result<()> {
        if self.validation.recommended_size < self.validation.min_file_size {
            return Err(Error::InvalidConfig {
                path: path.to_native(),
                message: format!(
                    "validation.recommended_size ({}) is below validation.min_file_size ({})",
                    self.validation.recommended_size, self.validation.min_file_size
                ),
            });
        }
        Ok(())
    }
}

/// Load `.storyline/config.toml` under `root`.
///
/// A missing file yields the defaults.
pub fn load_config(root: &NormalizedPath) -> Result<StorylineConfig> {
    let path = root.join(StoryPath::ConfigFile.as_str());

    if !path.is_file() {
        tracing::debug!(path = %path, "no config file, using defaults");
        return Ok(StorylineConfig::default());
    }

    let size = io::file_size(&path)?;
    if size > MAX_CONFIG_SIZE {
        return Err(Error::ConfigTooLarge {
            path: path.to_native(),
            size,
            max: MAX_CONFIG_SIZE,
        });
    }

    let content = io::read_text(&path)?;
    let config = StorylineConfig::from_toml(&path, &content)?;
    tracing::debug!(path = %path, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_story_paths() {
        let config = StorylineConfig::default();
        assert_eq!(config.paths.story_dir, StoryPath::StoryDir.as_str());
        assert_eq!(config.paths.sprint_status, StoryPath::SprintStatus.as_str());
        assert_eq!(config.paths.backup_dir, ".sprint-status-backups");
        assert_eq!(config.validation.min_file_size, 10240);
        assert_eq!(config.validation.min_tasks, 20);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let path = NormalizedPath::new("config.toml");
        let config =
            StorylineConfig::from_toml(&path, "[validation]\nmin_tasks = 5\n").unwrap();
        assert_eq!(config.validation.min_tasks, 5);
        assert_eq!(config.validation.max_repetitions, 3);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_inverted_size_thresholds_rejected() {
        let path = NormalizedPath::new("config.toml");
        let result = StorylineConfig::from_toml(
            &path,
            "[validation]\nmin_file_size = 100\nrecommended_size = 50\n",
        );
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}
