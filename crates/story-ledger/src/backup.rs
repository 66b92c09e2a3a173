//! Timestamped ledger backups
//!
//! Each fix run that changes the ledger first copies the pre-change text to
//! `<backup_dir>/<stem>-<YYYYmmdd-HHMMSS>.<ext>`. Backups are never pruned.

use chrono::NaiveDateTime;
use story_fs::{NormalizedPath, io};

use crate::{Error, Result};

/// Directory receiving ledger backups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupStore {
    dir: NormalizedPath,
}

impl BackupStore {
    pub fn new(dir: NormalizedPath) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &NormalizedPath {
        &self.dir
    }

    /// Write `content` as the backup of `ledger_path` taken at `at`.
    ///
    /// The directory is created when absent. A second backup within the
    /// same second gets a numeric suffix rather than replacing the first.
    pub fn write(
        &self,
        ledger_path: &NormalizedPath,
        content: &str,
        at: NaiveDateTime,
    ) -> Result<NormalizedPath> {
        let stem = ledger_path.file_stem().unwrap_or("ledger");
        let extension = ledger_path.extension().unwrap_or("yaml");
        let stamp = at.format("%Y%m%d-%H%M%S");

        let mut target = self.dir.join(&format!("{stem}-{stamp}.{extension}"));
        let mut counter = 1;
        while target.exists() {
            target = self
                .dir
                .join(&format!("{stem}-{stamp}-{counter}.{extension}"));
            counter += 1;
        }

        io::write_text(&target, content).map_err(|source| Error::BackupFailed {
            path: ledger_path.to_native(),
            source,
        })?;

        tracing::info!(backup = %target, "ledger backup created");
        Ok(target)
    }

    /// Existing backups, oldest first.
    pub fn list(&self) -> Result<Vec<NormalizedPath>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = io::list_files(&self.dir, "yaml")?;
        files.extend(io::list_files(&self.dir, "yml")?);
        files.sort();
        Ok(files)
    }
}
