//! Differences between scanned statuses and the ledger, and their repair

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use story_ledger::{InsertOutcome, SprintLedger, UpdateOutcome};

use crate::status::Status;

/// What the ledger currently records for a story
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "status", rename_all = "kebab-case")]
pub enum LedgerValue {
    /// No entry for the story
    Absent,
    /// Recorded status text, which may lie outside the vocabulary
    Recorded(String),
}

impl LedgerValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Display for LedgerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("(not in file)"),
            Self::Recorded(status) => f.write_str(status),
        }
    }
}

/// A story whose own status disagrees with the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub id: String,
    pub ledger: LedgerValue,
    pub scanned: Status,
}

/// Compare scanned statuses with the ledger, ordered by story id.
///
/// Stories whose ledger status already equals the scanned one are not
/// reported. Any filtering must happen on `scanned` before this call.
pub fn reconcile(scanned: &BTreeMap<String, Status>, ledger: &SprintLedger) -> Vec<Discrepancy> {
    let outline = ledger.outline();

    for &index in &outline.malformed {
        tracing::warn!(
            line = index + 1,
            text = %ledger.lines()[index].trim_end(),
            "malformed ledger entry skipped"
        );
    }

    scanned
        .iter()
        .filter_map(|(id, &status)| {
            let ledger_value = match outline.lookup(id) {
                Some(node) if node.status == status.as_str() => return None,
                Some(node) => LedgerValue::Recorded(node.status.clone()),
                None => LedgerValue::Absent,
            };
            Some(Discrepancy {
                id: id.clone(),
                ledger: ledger_value,
                scanned: status,
            })
        })
        .collect()
}

/// A ledger edit that took effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedChange {
    pub id: String,
    pub from: LedgerValue,
    pub to: Status,
}

/// A discrepancy that could not be written into the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedChange {
    pub id: String,
    pub reason: String,
}

/// Outcome of [`apply`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<AppliedChange>,
    pub skipped: Vec<SkippedChange>,
    pub marker_touched: bool,
}

/// Comment attached to every line written by a fix run.
pub fn update_comment(today: NaiveDate) -> String {
    format!("Updated {}", today.format("%Y-%m-%d"))
}

/// Write each discrepancy into the in-memory ledger.
///
/// Existing entries are updated in place, absent ones inserted below their
/// epic; both carry an `Updated <date>` comment. The `# last_verified:`
/// header is refreshed afterwards. Nothing touches the disk.
pub fn apply(
    discrepancies: &[Discrepancy],
    ledger: &mut SprintLedger,
    now: NaiveDateTime,
) -> ApplyReport {
    let comment = update_comment(now.date());
    let mut report = ApplyReport::default();

    for discrepancy in discrepancies {
        let id = discrepancy.id.as_str();
        let status = discrepancy.scanned.as_str();

        let skipped = match &discrepancy.ledger {
            LedgerValue::Recorded(_) => match ledger.update_entry(id, status, Some(&comment)) {
                UpdateOutcome::Updated { .. } => None,
                UpdateOutcome::Unchanged => Some("already up to date".to_string()),
                UpdateOutcome::NotFound => Some("entry disappeared from ledger".to_string()),
            },
            LedgerValue::Absent => match ledger.insert_entry(id, status, Some(&comment)) {
                InsertOutcome::Inserted { .. } => None,
                InsertOutcome::AlreadyPresent { .. } => Some("entry already present".to_string()),
                InsertOutcome::NoEpicPrefix => Some("cannot determine epic".to_string()),
                InsertOutcome::InvalidKey => Some("id is not usable as a ledger key".to_string()),
                InsertOutcome::EpicNotFound { epic_key } => {
                    Some(format!("{epic_key} not found in development_status"))
                }
            },
        };

        match skipped {
            None => report.applied.push(AppliedChange {
                id: discrepancy.id.clone(),
                from: discrepancy.ledger.clone(),
                to: discrepancy.scanned,
            }),
            Some(reason) => report.skipped.push(SkippedChange {
                id: discrepancy.id.clone(),
                reason,
            }),
        }
    }

    report.marker_touched = ledger.touch_verification_marker_at(now);
    report
}
