//! Checks and bulk edits over story documents
//!
//! These operate on the numbered story files (`[0-9]*.md`) of the story
//! directory and are independent of the ledger reconciliation, apart from
//! [`backfill`] which reads statuses from the ledger.

use serde::Serialize;
use story_fs::{NormalizedPath, io};

pub mod backfill;
pub mod checkbox;
pub mod repetition;
pub mod selection;
pub mod validate;

pub use backfill::{BackfillReport, BackfilledStory, backfill_status_fields, insert_status_field};
pub use checkbox::{CheckboxChange, CheckboxCounts, CheckboxReport, reset_checkboxes, uncheck_all};
pub use repetition::{CleanReport, CleanedFile, Repetition, clean_repetitions, dedupe_paragraphs};
pub use selection::{StorySelection, select_story_files};
pub use validate::{Finding, Severity, ValidationReport, ValidationStats, validate_stories, validate_story};

/// A document a bulk tool could not read and skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadableStory {
    pub file: String,
    pub message: String,
}

/// Read a story document; on failure log it, record it in `unreadable`
/// and return `None` so the batch carries on.
pub(crate) fn read_or_skip(path: &NormalizedPath, unreadable: &mut Vec<UnreadableStory>) -> Option<String> {
    match io::read_text(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!(file = %path, error = %e, "skipping unreadable story document");
            unreadable.push(UnreadableStory {
                file: path.file_name().unwrap_or(path.as_str()).to_string(),
                message: e.to_string(),
            });
            None
        }
    }
}

/// Paragraphs at or below this many characters are never compared.
pub const MIN_PARAGRAPH_CHARS: usize = 50;

/// Blank-line separated paragraphs longer than [`MIN_PARAGRAPH_CHARS`],
/// trimmed.
pub(crate) fn substantial_paragraphs(content: &str) -> impl Iterator<Item = &str> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
}

/// Shorten `text` to `max` characters with a trailing ellipsis.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
