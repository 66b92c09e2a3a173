//! Copy-paste loops: paragraphs repeated within one document

use std::collections::HashMap;

use serde::Serialize;
use story_fs::{NormalizedPath, io};

use super::{UnreadableStory, read_or_skip, substantial_paragraphs};
use crate::Result;

/// `clean` removes copies of paragraphs seen more often than this.
pub const CLEAN_THRESHOLD: usize = 2;

/// A paragraph and how often it occurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repetition {
    pub text: String,
    pub count: usize,
}

/// Paragraphs occurring more than `threshold` times, in order of first
/// appearance.
pub fn repeated_paragraphs(content: &str, threshold: usize) -> Vec<Repetition> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for paragraph in substantial_paragraphs(content) {
        let count = counts.entry(paragraph).or_insert(0);
        if *count == 0 {
            order.push(paragraph);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|text| {
            let count = counts[text];
            (count > threshold).then(|| Repetition {
                text: text.to_string(),
                count,
            })
        })
        .collect()
}

/// A document with repeated paragraphs collapsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduped {
    pub content: String,
    pub removed: usize,
    pub repetitions: Vec<Repetition>,
}

/// Drop every copy after the first of paragraphs repeated more than
/// `threshold` times.
///
/// Paragraphs are compared by trimmed text but kept verbatim, and the
/// survivors are rejoined with a blank line. Content without repetitions
/// comes back untouched.
pub fn dedupe_paragraphs(content: &str, threshold: usize) -> Deduped {
    let repetitions = repeated_paragraphs(content, threshold);
    if repetitions.is_empty() {
        return Deduped {
            content: content.to_string(),
            removed: 0,
            repetitions,
        };
    }

    let mut seen: HashMap<&str, bool> = repetitions
        .iter()
        .map(|r| (r.text.as_str(), false))
        .collect();
    let mut kept: Vec<&str> = Vec::new();
    let mut removed = 0;

    for paragraph in content.split("\n\n") {
        match seen.get_mut(paragraph.trim()) {
            Some(already) if *already => removed += 1,
            Some(already) => {
                *already = true;
                kept.push(paragraph);
            }
            None => kept.push(paragraph),
        }
    }

    Deduped {
        content: kept.join("\n\n"),
        removed,
        repetitions,
    }
}

/// Cleanup result for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedFile {
    pub file: String,
    pub removed: usize,
    pub repetitions: Vec<Repetition>,
}

/// Outcome of [`clean_repetitions`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub files_processed: usize,
    /// Documents that had repetitions, in file order
    pub cleaned: Vec<CleanedFile>,
    pub total_removed: usize,
    pub unreadable: Vec<UnreadableStory>,
    /// Whether the documents were rewritten
    pub applied: bool,
}

/// Collapse repeated paragraphs in each of `files`, writing only when
/// `apply` is set.
pub fn clean_repetitions(files: &[NormalizedPath], apply: bool) -> Result<CleanReport> {
    let mut report = CleanReport {
        files_processed: files.len(),
        applied: apply,
        ..CleanReport::default()
    };

    for path in files {
        let Some(content) = read_or_skip(path, &mut report.unreadable) else {
            continue;
        };
        let deduped = dedupe_paragraphs(&content, CLEAN_THRESHOLD);
        if deduped.removed == 0 {
            continue;
        }

        if apply {
            io::write_text(path, &deduped.content)?;
        }
        tracing::debug!(file = %path, removed = deduped.removed, apply, "repetitions collapsed");

        report.total_removed += deduped.removed;
        report.cleaned.push(CleanedFile {
            file: path.file_name().unwrap_or(path.as_str()).to_string(),
            removed: deduped.removed,
            repetitions: deduped.repetitions,
        });
    }

    Ok(report)
}
