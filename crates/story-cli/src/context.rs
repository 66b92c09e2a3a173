//! Workspace resolution from the global flags
//!
//! The base directory is `--root` or the current directory; it is never
//! changed process-wide, every path is resolved against it instead.

use std::path::Path;

use story_fs::NormalizedPath;
use story_meta::{PathOverrides, Workspace};

use crate::error::Result;

pub fn resolve_workspace(
    root: Option<&Path>,
    story_dir: Option<String>,
    sprint_status: Option<String>,
) -> Result<Workspace> {
    let root = match root {
        Some(path) => NormalizedPath::new(path),
        None => NormalizedPath::new(std::env::current_dir()?),
    };
    let overrides = PathOverrides {
        story_dir,
        sprint_status,
    };

    let workspace = Workspace::load(root, &overrides)?;
    tracing::debug!(
        root = %workspace.root,
        story_dir = %workspace.story_dir,
        ledger = %workspace.sprint_status,
        "workspace resolved"
    );
    Ok(workspace)
}
