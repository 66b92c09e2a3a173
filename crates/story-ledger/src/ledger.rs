//! The sprint ledger as an editable sequence of raw lines

use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use story_fs::{NormalizedPath, io};

use crate::backup::BackupStore;
use crate::line::{EntryLine, epic_key_for, indent_of, render_new_entry, section_range, split_cr};
use crate::outline::{LedgerOutline, is_epic_key};
use crate::{Error, Result, VERIFIED_MARKER};

/// Result of an in-place status update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The line was rewritten; `previous` is the replaced status
    Updated { previous: String },
    /// The entry already carries the requested status
    Unchanged,
    /// No entry with that key inside the section
    NotFound,
}

/// Result of inserting a new entry line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New line placed at this index
    Inserted { line: usize },
    /// An entry with that key already exists at this index
    AlreadyPresent { line: usize },
    /// The id has no leading `<digits>[letter]-` epic prefix
    NoEpicPrefix,
    /// The owning epic line is not in the section
    EpicNotFound { epic_key: String },
    /// The id would not read back as a key (whitespace or `:` in it)
    InvalidKey,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// What [`SprintLedger::save`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Backup written before the overwrite
    pub backup: Option<NormalizedPath>,
    /// Whether the ledger file was rewritten
    pub written: bool,
}

/// In-memory ledger.
///
/// Holds the text exactly as read plus the current line list. Only lines
/// passed to an update or insert change; joining the list with `\n`
/// reproduces every other byte of the original.
#[derive(Debug, Clone)]
pub struct SprintLedger {
    path: NormalizedPath,
    original: String,
    lines: Vec<String>,
    updates_applied: usize,
    backups: BackupStore,
}

impl SprintLedger {
    /// Read the ledger at `path`.
    ///
    /// Backups default to `.sprint-status-backups` next to the ledger.
    ///
    /// # Errors
    ///
    /// [`Error::LedgerNotFound`] when the file does not exist, otherwise the
    /// underlying read error.
    pub fn load(path: NormalizedPath) -> Result<Self> {
        let content = io::read_text(&path).map_err(|e| {
            if e.is_not_found() {
                Error::LedgerNotFound {
                    path: path.to_native(),
                }
            } else {
                Error::Fs(e)
            }
        })?;
        tracing::debug!(path = %path, bytes = content.len(), "ledger loaded");
        Ok(Self::from_content(path, content))
    }

    /// Wrap already-read ledger text.
    pub fn from_content(path: NormalizedPath, content: String) -> Self {
        let lines = content.split('\n').map(String::from).collect();
        let backup_dir = path
            .parent()
            .unwrap_or_else(|| NormalizedPath::new("."))
            .join(story_fs::StoryPath::BackupDir.as_str());
        Self {
            path,
            original: content,
            lines,
            updates_applied: 0,
            backups: BackupStore::new(backup_dir),
        }
    }

    /// Send backups to `store` instead of the default location.
    pub fn with_backup_store(mut self, store: BackupStore) -> Self {
        self.backups = store;
        self
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Current text.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Text as it was loaded (or last saved).
    pub fn original_content(&self) -> &str {
        &self.original
    }

    /// True when any line differs from the loaded text.
    pub fn is_modified(&self) -> bool {
        self.content() != self.original
    }

    /// Number of entry updates and inserts applied since load.
    pub fn updates_applied(&self) -> usize {
        self.updates_applied
    }

    /// Epic/story tree of the current lines.
    pub fn outline(&self) -> LedgerOutline {
        LedgerOutline::build(&self.lines)
    }

    /// Index of the first section line whose key is `id`.
    pub fn find_entry(&self, id: &str) -> Option<usize> {
        let outline = self.outline();
        if let Some(node) = outline.lookup(id) {
            return Some(node.line);
        }

        let prefix = format!("{id}:");
        for &index in &outline.malformed {
            if self.lines[index].trim_start().starts_with(&prefix) {
                tracing::warn!(
                    id,
                    line = index + 1,
                    text = %self.lines[index].trim_end(),
                    "malformed ledger entry ignored"
                );
            }
        }
        None
    }

    /// Current status recorded for `id`.
    pub fn status_of(&self, id: &str) -> Option<String> {
        let index = self.find_entry(id)?;
        EntryLine::parse(&self.lines[index]).map(|entry| entry.status.to_string())
    }

    /// Status of every non-epic entry, first occurrence winning.
    pub fn statuses(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for node in self.outline().stories() {
            map.entry(node.key.clone())
                .or_insert_with(|| node.status.clone());
        }
        map
    }

    /// Rewrite the status of an existing entry in place.
    ///
    /// `comment` replaces the trailing comment; `None` keeps it. Nothing is
    /// touched (and the update counter stays put) when the status is
    /// already `status`.
    pub fn update_entry(&mut self, id: &str, status: &str, comment: Option<&str>) -> UpdateOutcome {
        let Some(index) = self.find_entry(id) else {
            return UpdateOutcome::NotFound;
        };
        self.rewrite_line(index, status, comment)
    }

    /// [`update_entry`](Self::update_entry) restricted to `epic-<n>` keys.
    pub fn update_epic(
        &mut self,
        epic_key: &str,
        status: &str,
        comment: Option<&str>,
    ) -> UpdateOutcome {
        if !is_epic_key(epic_key) {
            tracing::warn!(epic_key, "not an epic key");
            return UpdateOutcome::NotFound;
        }
        let Some(index) = self.outline().epic(epic_key).map(|epic| epic.entry.line) else {
            tracing::warn!(epic_key, "epic not found in development_status");
            return UpdateOutcome::NotFound;
        };
        self.rewrite_line(index, status, comment)
    }

    fn rewrite_line(&mut self, index: usize, status: &str, comment: Option<&str>) -> UpdateOutcome {
        let Some(entry) = EntryLine::parse(&self.lines[index]) else {
            return UpdateOutcome::NotFound;
        };
        if entry.status == status {
            return UpdateOutcome::Unchanged;
        }

        let previous = entry.status.to_string();
        let rendered = entry.render(status, comment);
        tracing::debug!(key = entry.key, from = %previous, to = status, "entry updated");

        self.lines[index] = rendered;
        self.updates_applied += 1;
        UpdateOutcome::Updated { previous }
    }

    /// Add a new entry directly below its epic line.
    ///
    /// The epic is `epic-<prefix>` where prefix is the id's leading
    /// `<digits>[letter]`; the new line copies that epic line's indentation.
    pub fn insert_entry(&mut self, id: &str, status: &str, comment: Option<&str>) -> InsertOutcome {
        if let Some(line) = self.find_entry(id) {
            return InsertOutcome::AlreadyPresent { line };
        }

        let Some(epic_key) = epic_key_for(id) else {
            tracing::warn!(id, "cannot determine epic for story, insert skipped");
            return InsertOutcome::NoEpicPrefix;
        };

        let Some(epic_line) = self.find_epic_line(&epic_key) else {
            tracing::warn!(id, %epic_key, "epic not found in development_status, insert skipped");
            return InsertOutcome::EpicNotFound { epic_key };
        };

        let indent = indent_of(&self.lines[epic_line]).to_string();
        let crlf = split_cr(&self.lines[epic_line]).1;
        let rendered = render_new_entry(&indent, id, status, comment, crlf);
        if !EntryLine::parse(&rendered).is_some_and(|entry| entry.key == id) {
            tracing::warn!(id, "id is not usable as a ledger key, insert skipped");
            return InsertOutcome::InvalidKey;
        }

        let line = epic_line + 1;
        self.lines.insert(line, rendered);
        self.updates_applied += 1;
        tracing::debug!(id, status, line = line + 1, "entry inserted");
        InsertOutcome::Inserted { line }
    }

    /// Index of the `epic-<n>:` line inside the section.
    ///
    /// Matched on the key alone, so an epic line without a status still
    /// anchors inserts.
    fn find_epic_line(&self, epic_key: &str) -> Option<usize> {
        let prefix = format!("{epic_key}:");
        section_range(&self.lines)?
            .find(|&index| split_cr(&self.lines[index]).0.trim_start().starts_with(&prefix))
    }

    /// Update when present, insert otherwise.
    pub fn upsert_entry(&mut self, id: &str, status: &str, comment: Option<&str>) -> bool {
        match self.update_entry(id, status, comment) {
            UpdateOutcome::Updated { .. } => true,
            UpdateOutcome::Unchanged => false,
            UpdateOutcome::NotFound => self.insert_entry(id, status, comment).is_inserted(),
        }
    }

    /// Refresh the `# last_verified:` header with the current local time.
    pub fn touch_verification_marker(&mut self) -> bool {
        self.touch_verification_marker_at(Local::now().naive_local())
    }

    /// Refresh the `# last_verified:` header line, if the ledger has one.
    ///
    /// Returns whether a marker line exists.
    pub fn touch_verification_marker_at(&mut self, at: NaiveDateTime) -> bool {
        let Some(index) = self
            .lines
            .iter()
            .position(|line| line.starts_with(VERIFIED_MARKER))
        else {
            return false;
        };

        let crlf = split_cr(&self.lines[index]).1;
        let mut line = format!("{} {}", VERIFIED_MARKER, at.format("%Y-%m-%d %H:%M:%S"));
        if crlf {
            line.push('\r');
        }
        self.lines[index] = line;
        true
    }

    /// Write the ledger back, backing up the previous text first.
    pub fn save(&mut self, make_backup: bool) -> Result<SaveReport> {
        self.save_at(make_backup, Local::now().naive_local())
    }

    /// Write the ledger back using `at` for the backup timestamp.
    ///
    /// An unmodified ledger is left alone. Otherwise, with `make_backup`,
    /// the loaded text is written to the backup store and only then is the
    /// ledger overwritten; a failed backup aborts before the overwrite.
    pub fn save_at(&mut self, make_backup: bool, at: NaiveDateTime) -> Result<SaveReport> {
        if !self.is_modified() {
            tracing::debug!(path = %self.path, "ledger unchanged, nothing to save");
            return Ok(SaveReport::default());
        }

        let backup = if make_backup {
            Some(self.backups.write(&self.path, &self.original, at)?)
        } else {
            None
        };

        let content = self.content();
        io::write_text(&self.path, &content)?;
        self.original = content;

        Ok(SaveReport {
            backup,
            written: true,
        })
    }
}
