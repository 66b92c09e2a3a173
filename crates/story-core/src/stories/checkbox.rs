//! Task checkboxes in story documents
//!
//! A freshly generated story must have every task unchecked; checked boxes
//! in a story that has not been worked on are a generation defect.

use serde::Serialize;
use story_fs::{NormalizedPath, io};

use super::{UnreadableStory, read_or_skip};
use crate::Result;

const CHECKED: [&str; 2] = ["- [x]", "- [X]"];
const UNCHECKED: &str = "- [ ]";

/// Checkbox tally of one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckboxCounts {
    pub checked: usize,
    pub unchecked: usize,
}

impl CheckboxCounts {
    pub fn of(content: &str) -> Self {
        Self {
            checked: CHECKED.iter().map(|m| content.matches(m).count()).sum(),
            unchecked: content.matches(UNCHECKED).count(),
        }
    }

    pub fn total(&self) -> usize {
        self.checked + self.unchecked
    }

    /// Share of checked boxes in percent; zero without boxes.
    pub fn checked_percent(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.checked as f64 * 100.0 / total as f64,
        }
    }
}

/// Uncheck every box, returning the new text and how many changed.
pub fn uncheck_all(content: &str) -> (String, usize) {
    let changed = CheckboxCounts::of(content).checked;
    let mut text = content.to_string();
    for marker in CHECKED {
        text = text.replace(marker, UNCHECKED);
    }
    (text, changed)
}

/// One document with checked boxes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckboxChange {
    pub file: String,
    pub unchecked: usize,
}

/// Outcome of [`reset_checkboxes`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckboxReport {
    pub files_processed: usize,
    pub changes: Vec<CheckboxChange>,
    pub total_unchecked: usize,
    pub unreadable: Vec<UnreadableStory>,
    pub applied: bool,
}

/// Uncheck all boxes in `files`; documents are only rewritten when `apply`
/// is set.
pub fn reset_checkboxes(files: &[NormalizedPath], apply: bool) -> Result<CheckboxReport> {
    let mut report = CheckboxReport {
        files_processed: files.len(),
        applied: apply,
        ..CheckboxReport::default()
    };

    for path in files {
        let Some(content) = read_or_skip(path, &mut report.unreadable) else {
            continue;
        };
        let (text, changed) = uncheck_all(&content);
        if changed == 0 {
            continue;
        }

        if apply {
            io::write_text(path, &text)?;
        }

        report.total_unchecked += changed;
        report.changes.push(CheckboxChange {
            file: path.file_name().unwrap_or(path.as_str()).to_string(),
            unchecked: changed,
        });
    }

    tracing::debug!(
        files = report.changes.len(),
        boxes = report.total_unchecked,
        apply,
        "checkbox reset"
    );
    Ok(report)
}
