//! Epic → story grouping rebuilt from the flat section scan

use std::sync::LazyLock;

use regex::Regex;

use crate::line::{EntryLine, is_blank_or_comment, section_range};

static EPIC_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^epic-[0-9A-Za-z]+$").expect("Invalid epic key regex"));

/// One recognized entry line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNode {
    pub key: String,
    pub status: String,
    /// Index into the ledger's line list
    pub line: usize,
}

/// An epic line and the entries positioned beneath it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicNode {
    pub entry: EntryNode,
    pub stories: Vec<EntryNode>,
}

/// Ordered tree view of the `development_status:` section.
///
/// Lines stay the storage; the outline only indexes them, so it must be
/// rebuilt after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerOutline {
    /// Whether a `development_status:` header exists at all
    pub has_section: bool,
    /// Entries that appear before the first epic line
    pub loose: Vec<EntryNode>,
    pub epics: Vec<EpicNode>,
    /// Indices of indented lines that look like entries but do not parse
    pub malformed: Vec<usize>,
}

impl LedgerOutline {
    /// Build the outline from raw ledger lines.
    pub fn build(lines: &[String]) -> Self {
        let Some(range) = section_range(lines) else {
            return Self::default();
        };

        let mut outline = Self {
            has_section: true,
            ..Self::default()
        };

        for index in range {
            let line = &lines[index];
            if is_blank_or_comment(line) {
                continue;
            }
            let Some(entry) = EntryLine::parse(line) else {
                outline.malformed.push(index);
                continue;
            };

            let node = EntryNode {
                key: entry.key.to_string(),
                status: entry.status.to_string(),
                line: index,
            };

            if is_epic_key(&node.key) {
                outline.epics.push(EpicNode {
                    entry: node,
                    stories: Vec::new(),
                });
            } else if let Some(epic) = outline.epics.last_mut() {
                epic.stories.push(node);
            } else {
                outline.loose.push(node);
            }
        }

        outline
    }

    /// Every entry in line order, epics included.
    pub fn entries(&self) -> impl Iterator<Item = &EntryNode> {
        self.loose.iter().chain(
            self.epics
                .iter()
                .flat_map(|epic| std::iter::once(&epic.entry).chain(epic.stories.iter())),
        )
    }

    /// First entry whose key equals `key`.
    pub fn lookup(&self, key: &str) -> Option<&EntryNode> {
        self.entries().find(|node| node.key == key)
    }

    /// The epic line with exactly this key.
    pub fn epic(&self, epic_key: &str) -> Option<&EpicNode> {
        self.epics.iter().find(|epic| epic.entry.key == epic_key)
    }

    /// Non-epic entries.
    pub fn stories(&self) -> impl Iterator<Item = &EntryNode> {
        self.loose
            .iter()
            .chain(self.epics.iter().flat_map(|epic| epic.stories.iter()))
    }
}

/// `epic-<n>` keys; `epic-1-retrospective` style keys are ordinary entries.
pub fn is_epic_key(key: &str) -> bool {
    EPIC_KEY_REGEX.is_match(key)
}
