//! Configuration management for Storyline.
//!
//! Loads the optional `.storyline/config.toml` and resolves every configured
//! location against an explicit base directory.

pub mod config;
pub mod error;
pub mod workspace;

pub use config::{PathsConfig, StorylineConfig, ValidationConfig, load_config};
pub use error::{Error, Result};
pub use workspace::{PathOverrides, Workspace};
