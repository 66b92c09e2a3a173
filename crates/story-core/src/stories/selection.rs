//! Which story files a bulk command touches

use story_fs::{NormalizedPath, io};

use crate::epic::EpicFilter;
use crate::{Error, Result};

/// Story files to operate on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorySelection {
    /// Every numbered story file
    All,
    /// Stories of one epic
    Epic(EpicFilter),
}

impl StorySelection {
    pub fn from_epic(epic: Option<EpicFilter>) -> Self {
        epic.map_or(Self::All, Self::Epic)
    }

    fn includes(&self, stem: &str) -> bool {
        match self {
            Self::All => true,
            Self::Epic(filter) => filter.matches(stem),
        }
    }
}

/// Numbered story files (`[0-9]*.md`) in `dir`, sorted by name.
pub fn select_story_files(
    dir: &NormalizedPath,
    selection: &StorySelection,
) -> Result<Vec<NormalizedPath>> {
    if !dir.is_dir() {
        return Err(Error::StoryDirNotFound {
            path: dir.to_native(),
        });
    }

    let files = io::list_files(dir, "md")?
        .into_iter()
        .filter(|path| {
            path.file_stem().is_some_and(|stem| {
                stem.starts_with(|c: char| c.is_ascii_digit()) && selection.includes(stem)
            })
        })
        .collect();
    Ok(files)
}
