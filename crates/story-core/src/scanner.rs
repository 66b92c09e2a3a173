//! Status markers read from story documents
//!
//! A story document declares its own state with a marker line such as
//! `Status: done` or `**Status:** in-progress  # note`. Documents without
//! a marker are left out of the scan entirely, so the ledger keeps its
//! value for them.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use story_fs::{NormalizedPath, io};

use crate::status::{Status, normalize};
use crate::{Error, Result};

/// `Status:` at line start, optionally bold on either side of the colon.
static STATUS_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:\*\*)?status(?:\*\*)?:(?:\*\*)?[ \t]*(.*)$")
        .expect("Invalid status marker regex")
});

/// Upper-cased name fragments marking meta documents rather than stories.
pub const EXCLUDED_TOKENS: [&str; 7] = [
    "COMPLETION",
    "SUMMARY",
    "REPORT",
    "README",
    "INDEX",
    "REVIEW",
    "AUDIT",
];

/// Whether a document id names something other than a trackable story.
///
/// Hardening stories such as `EPIC-7-...` (digit after the prefix) stay
/// eligible; `EPIC-OVERVIEW` style documents do not.
pub fn is_excluded(id: &str) -> bool {
    let Some(first) = id.chars().next() else {
        return true;
    };
    if !first.is_alphanumeric() {
        return true;
    }
    if let Some(rest) = id.strip_prefix("EPIC-") {
        if !rest.starts_with(|c: char| c.is_ascii_digit()) {
            return true;
        }
    }
    let upper = id.to_uppercase();
    EXCLUDED_TOKENS.iter().any(|token| upper.contains(token))
}

/// Raw text of the first status marker, trailing `#` comment removed.
///
/// A marker with nothing after it counts as no marker.
pub fn extract_status_marker(content: &str) -> Option<String> {
    let caps = STATUS_MARKER_REGEX.captures(content)?;
    let raw = caps.get(1)?.as_str();
    let value = raw.split('#').next().unwrap_or("").trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Scan behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Leave out documents whose status text is unrecognized instead of
    /// defaulting them to ready-for-dev
    pub strict: bool,
}

/// A document whose status text matched nothing in the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnrecognizedStatus {
    pub id: String,
    pub raw: String,
}

/// A document that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub id: String,
    pub message: String,
}

/// Result of scanning a story directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Normalized status per document id, for documents with a marker
    pub statuses: BTreeMap<String, Status>,
    /// Eligible documents looked at
    pub eligible: usize,
    /// Documents excluded by name
    pub excluded: usize,
    /// Eligible documents without a status marker
    pub without_marker: usize,
    pub unrecognized: Vec<UnrecognizedStatus>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// Keep only statuses whose id satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.statuses.retain(|id, _| keep(id));
    }
}

/// Scan every `*.md` document directly inside `dir`.
///
/// # Errors
///
/// Only a missing or unlistable directory is an error; unreadable documents
/// are logged, recorded in [`ScanReport::failures`] and skipped.
pub fn scan(dir: &NormalizedPath, options: ScanOptions) -> Result<ScanReport> {
    if !dir.is_dir() {
        return Err(Error::StoryDirNotFound {
            path: dir.to_native(),
        });
    }

    let mut report = ScanReport::default();

    for path in io::list_files(dir, "md")? {
        let Some(id) = path.file_stem().map(str::to_string) else {
            continue;
        };
        if is_excluded(&id) {
            report.excluded += 1;
            continue;
        }
        report.eligible += 1;

        let content = match io::read_text(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(%id, error = %e, "skipping unreadable story document");
                report.failures.push(ScanFailure {
                    id,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let Some(raw) = extract_status_marker(&content) else {
            tracing::debug!(%id, "no status marker");
            report.without_marker += 1;
            continue;
        };

        let normalized = normalize(&raw);
        if normalized.fallback {
            tracing::warn!(%id, raw = %raw, strict = options.strict, "unrecognized status text");
            report.unrecognized.push(UnrecognizedStatus {
                id: id.clone(),
                raw,
            });
            if options.strict {
                continue;
            }
        }

        report.statuses.insert(id, normalized.status);
    }

    tracing::debug!(
        with_status = report.statuses.len(),
        without_marker = report.without_marker,
        excluded = report.excluded,
        "scan complete"
    );
    Ok(report)
}
