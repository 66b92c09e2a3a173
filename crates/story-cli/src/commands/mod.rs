//! Command implementations for story-cli

pub mod backfill;
pub mod clean;
pub mod fix_checkboxes;
pub mod sync;
pub mod validate;

pub use backfill::run_backfill;
pub use clean::run_clean;
pub use fix_checkboxes::run_fix_checkboxes;
pub use sync::run_sync;
pub use validate::run_validate;

use story_core::EpicFilter;
use story_core::stories::{StorySelection, select_story_files};
use story_fs::NormalizedPath;
use story_meta::Workspace;

use crate::error::{CliError, Result};

/// Story files for the document tools; an unparseable `--epic` is an error
/// here, unlike for sync.
pub(crate) fn selected_files(workspace: &Workspace, epic: Option<&str>) -> Result<Vec<NormalizedPath>> {
    let filter = epic
        .map(|arg| {
            EpicFilter::parse(arg)
                .ok_or_else(|| CliError::user(format!("Invalid epic: {arg} (expected epic-N or N)")))
        })
        .transpose()?;
    Ok(select_story_files(
        &workspace.story_dir,
        &StorySelection::from_epic(filter),
    )?)
}
