//! Resolved locations for one invocation

use story_fs::NormalizedPath;

use crate::{Result, StorylineConfig, ValidationConfig, load_config};

/// Command-line overrides for configured paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathOverrides {
    pub story_dir: Option<String>,
    pub sprint_status: Option<String>,
}

/// The base directory plus every path the tools read or write,
/// already resolved against it.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: NormalizedPath,
    pub story_dir: NormalizedPath,
    pub sprint_status: NormalizedPath,
    pub backup_dir: NormalizedPath,
    pub validation: ValidationConfig,
}

impl Workspace {
    /// Build a workspace from an already loaded configuration.
    pub fn from_config(
        root: NormalizedPath,
        config: StorylineConfig,
        overrides: &PathOverrides,
    ) -> Self {
        let story_dir = overrides
            .story_dir
            .as_deref()
            .unwrap_or(&config.paths.story_dir);
        let sprint_status = overrides
            .sprint_status
            .as_deref()
            .unwrap_or(&config.paths.sprint_status);

        Self {
            story_dir: NormalizedPath::resolve(&root, story_dir),
            sprint_status: NormalizedPath::resolve(&root, sprint_status),
            backup_dir: NormalizedPath::resolve(&root, &config.paths.backup_dir),
            validation: config.validation,
            root,
        }
    }

    /// Load the configuration under `root` and apply `overrides`.
    pub fn load(root: NormalizedPath, overrides: &PathOverrides) -> Result<Self> {
        let config = load_config(&root)?;
        Ok(Self::from_config(root, config, overrides))
    }
}
