//! One status-sync pass: load ledger, scan stories, diff, then report,
//! preview or fix.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;
use similar::TextDiff;
use story_ledger::{BackupStore, SaveReport, SprintLedger};
use story_meta::Workspace;

use crate::epic::EpicFilter;
use crate::reconcile::{ApplyReport, Discrepancy, apply, reconcile};
use crate::scanner::{ScanOptions, ScanReport, scan};
use crate::Result;

/// How a sync pass treats the discrepancies it finds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Report only
    #[default]
    Validate,
    /// Show the ledger edits a fix would make
    DryRun,
    /// Write the edits, backing up the ledger first
    Fix,
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "validate" => Ok(Self::Validate),
            "dry-run" => Ok(Self::DryRun),
            "fix" => Ok(Self::Fix),
            other => Err(format!("unknown sync mode: {other}")),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validate => "validate",
            Self::DryRun => "dry-run",
            Self::Fix => "fix",
        })
    }
}

/// Parameters of one pass
#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    pub mode: SyncMode,
    /// Raw `--epic` argument; an unparseable value is ignored with a warning
    pub epic: Option<String>,
    pub scan: ScanOptions,
}

/// Everything a pass found and did
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub mode: SyncMode,
    pub ledger: String,
    /// Epic the scan was restricted to, when a valid filter was given
    pub epic: Option<String>,
    pub scan: ScanReport,
    pub discrepancies: Vec<Discrepancy>,
    /// Edits made (fix) or that would be made (dry-run)
    pub applied: Option<ApplyReport>,
    /// Unified diff of the ledger for dry-run
    pub preview: Option<String>,
    pub backup: Option<String>,
    pub written: bool,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Status synchronization between story documents and the ledger
pub struct StatusSync<'a> {
    workspace: &'a Workspace,
}

impl<'a> StatusSync<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self { workspace }
    }

    /// Run one pass.
    ///
    /// The ledger is read before anything else, so a missing or unreadable
    /// ledger aborts the pass before any scanning or writing. Only
    /// [`SyncMode::Fix`] writes, and only when discrepancies exist.
    pub fn run(&self, request: &SyncRequest, now: NaiveDateTime) -> Result<SyncReport> {
        let mut ledger = SprintLedger::load(self.workspace.sprint_status.clone())?
            .with_backup_store(BackupStore::new(self.workspace.backup_dir.clone()));

        if !ledger.outline().has_section {
            tracing::warn!(path = %ledger.path(), "ledger has no development_status section");
        }

        let mut scan_report = scan(&self.workspace.story_dir, request.scan)?;

        let filter = request.epic.as_deref().and_then(EpicFilter::parse_or_warn);
        if let Some(filter) = &filter {
            scan_report.retain(|id| filter.matches(id));
            tracing::debug!(epic = %filter, stories = scan_report.statuses.len(), "filtered scan");
        }

        let discrepancies = reconcile(&scan_report.statuses, &ledger);

        let mut report = SyncReport {
            mode: request.mode,
            ledger: ledger.path().to_string(),
            epic: filter.map(|f| f.to_string()),
            scan: scan_report,
            discrepancies,
            applied: None,
            preview: None,
            backup: None,
            written: false,
        };

        if report.is_clean() {
            return Ok(report);
        }

        match request.mode {
            SyncMode::Validate => {}
            SyncMode::DryRun => {
                let before = ledger.content();
                let mut scratch = ledger.clone();
                report.applied = Some(apply(&report.discrepancies, &mut scratch, now));
                report.preview = Some(ledger_diff(&ledger, &before, &scratch.content()));
            }
            SyncMode::Fix => {
                report.applied = Some(apply(&report.discrepancies, &mut ledger, now));
                let SaveReport { backup, written } = ledger.save_at(true, now)?;
                report.backup = backup.map(|path| path.to_string());
                report.written = written;
            }
        }

        Ok(report)
    }
}

fn ledger_diff(ledger: &SprintLedger, before: &str, after: &str) -> String {
    let name = ledger.path().to_string();
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(2)
        .header(&name, &name)
        .to_string()
}

