//! The closed status vocabulary and free-text normalization

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Lifecycle state of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Done,
    InProgress,
    Review,
    ReadyForDev,
    Backlog,
    Blocked,
    Deferred,
    Archived,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Done,
        Status::InProgress,
        Status::Review,
        Status::ReadyForDev,
        Status::Backlog,
        Status::Blocked,
        Status::Deferred,
        Status::Archived,
    ];

    /// Ledger spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Done => "done",
            Status::InProgress => "in-progress",
            Status::Review => "review",
            Status::ReadyForDev => "ready-for-dev",
            Status::Backlog => "backlog",
            Status::Blocked => "blocked",
            Status::Deferred => "deferred",
            Status::Archived => "archived",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: only the canonical spellings are accepted.
impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::UnknownStatus {
                value: s.to_string(),
            })
    }
}

/// Outcome of normalizing free status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub status: Status,
    /// Nothing recognizable; `status` is the ready-for-dev default
    pub fallback: bool,
}

/// Exact spellings accepted in story documents
const ALIASES: &[(&str, Status)] = &[
    ("done", Status::Done),
    ("complete", Status::Done),
    ("completed", Status::Done),
    ("in-progress", Status::InProgress),
    ("in_progress", Status::InProgress),
    ("review", Status::Review),
    ("ready-for-dev", Status::ReadyForDev),
    ("ready_for_dev", Status::ReadyForDev),
    ("pending", Status::ReadyForDev),
    ("drafted", Status::ReadyForDev),
    ("backlog", Status::Backlog),
    ("blocked", Status::Blocked),
    ("deferred", Status::Deferred),
    ("archived", Status::Archived),
];

/// Substring heuristics, tried in order after the exact aliases
const KEYWORDS: &[(&[&str], Status)] = &[
    (&["done", "complete"], Status::Done),
    (&["progress"], Status::InProgress),
    (&["review"], Status::Review),
    (&["ready"], Status::ReadyForDev),
    (&["block"], Status::Blocked),
    (&["defer"], Status::Deferred),
    (&["archive"], Status::Archived),
];

/// Map free status text onto the vocabulary.
///
/// Matching is case-insensitive. Text that matches neither an alias nor a
/// keyword becomes ready-for-dev with `fallback` set.
pub fn normalize(raw: &str) -> Normalized {
    let text = raw.trim().to_lowercase();

    if let Some((_, status)) = ALIASES.iter().find(|(alias, _)| *alias == text) {
        return Normalized {
            status: *status,
            fallback: false,
        };
    }

    for (needles, status) in KEYWORDS {
        if needles.iter().any(|needle| text.contains(needle)) {
            return Normalized {
                status: *status,
                fallback: false,
            };
        }
    }

    Normalized {
        status: Status::ReadyForDev,
        fallback: true,
    }
}
