//! Writing the ledger's status into story documents that lack a marker

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use story_fs::{NormalizedPath, io};
use story_ledger::SprintLedger;

use super::{UnreadableStory, read_or_skip};
use crate::scanner::is_excluded;
use crate::{Error, Result};

/// Any status marker, including an empty one.
static HAS_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:\*\*)?status(?:\*\*)?:").expect("Invalid status presence regex")
});

pub fn has_status_marker(content: &str) -> bool {
    HAS_MARKER_REGEX.is_match(content)
}

/// Insert a `**Status:**` line framed by blank lines.
///
/// The line goes before the first `##` section, or right after the title
/// when the document has no sections. Returns `None` when the document
/// already carries a marker.
pub fn insert_status_field(content: &str, status: &str) -> Option<String> {
    if has_status_marker(content) {
        return None;
    }

    let mut lines: Vec<&str> = content.split('\n').collect();
    let at = lines
        .iter()
        .enumerate()
        .find(|(index, line)| !(*index == 0 && line.starts_with("# ")) && line.starts_with("##"))
        .map_or(1, |(index, _)| index)
        .min(lines.len());

    let marker = format!("**Status:** {status}");
    for (offset, line) in ["", marker.as_str(), ""].into_iter().enumerate() {
        lines.insert(at + offset, line);
    }
    Some(lines.join("\n"))
}

/// A document that received a marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackfilledStory {
    pub id: String,
    pub status: String,
}

/// Outcome of [`backfill_status_fields`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub added: Vec<BackfilledStory>,
    /// Documents that already had a marker
    pub already_marked: usize,
    /// Eligible documents with no ledger entry
    pub missing_from_ledger: Vec<String>,
    pub unreadable: Vec<UnreadableStory>,
    pub applied: bool,
}

/// Give every eligible document in `dir` without a status marker the
/// status the ledger records for it.
pub fn backfill_status_fields(
    dir: &NormalizedPath,
    ledger: &SprintLedger,
    apply: bool,
) -> Result<BackfillReport> {
    if !dir.is_dir() {
        return Err(Error::StoryDirNotFound {
            path: dir.to_native(),
        });
    }

    let statuses = ledger.statuses();
    let mut report = BackfillReport {
        applied: apply,
        ..BackfillReport::default()
    };

    for path in io::list_files(dir, "md")? {
        let Some(id) = path.file_stem().map(str::to_string) else {
            continue;
        };
        if is_excluded(&id) {
            continue;
        }

        let Some(status) = statuses.get(&id) else {
            tracing::warn!(%id, "story not in ledger");
            report.missing_from_ledger.push(id);
            continue;
        };

        let Some(content) = read_or_skip(&path, &mut report.unreadable) else {
            continue;
        };
        let Some(updated) = insert_status_field(&content, status) else {
            report.already_marked += 1;
            continue;
        };

        if apply {
            io::write_text(&path, &updated)?;
        }
        report.added.push(BackfilledStory {
            id,
            status: status.clone(),
        });
    }

    Ok(report)
}
