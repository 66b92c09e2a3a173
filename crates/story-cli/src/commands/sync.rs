//! Status sync command
//!
//! Compares the status each story document declares with the sprint status
//! ledger and reports, previews or fixes the differences.

use chrono::Local;
use colored::Colorize;
use story_core::{ScanOptions, StatusSync, SyncMode, SyncReport, SyncRequest};
use story_meta::Workspace;

use crate::error::Result;
use crate::report::{Outcome, print_header, print_json, print_truncated};

/// Run the sync command.
///
/// Only validate mode turns discrepancies into a failing exit code.
pub fn run_sync(
    workspace: &Workspace,
    mode: SyncMode,
    epic: Option<String>,
    strict: bool,
    json: bool,
) -> Result<Outcome> {
    let request = SyncRequest {
        mode,
        epic,
        scan: ScanOptions { strict },
    };

    if !json {
        print_header(&format!("Scanning story documents in {}", workspace.story_dir));
    }

    let report = StatusSync::new(workspace).run(&request, Local::now().naive_local())?;
    let outcome = Outcome::from_clean(report.is_clean() || mode != SyncMode::Validate);

    if json {
        print_json(&report)?;
    } else {
        print_report(&report, strict);
    }
    Ok(outcome)
}

fn print_report(report: &SyncReport, strict: bool) {
    let scan = &report.scan;
    if let Some(epic) = &report.epic {
        println!("   Restricted to {}", epic.cyan());
    }
    println!(
        "   {} with status, {} without marker, {} excluded",
        scan.statuses.len(),
        scan.without_marker,
        scan.excluded
    );
    if !scan.unrecognized.is_empty() {
        let handling = if strict { "skipped" } else { "treated as ready-for-dev" };
        println!(
            "   {} {} unrecognized status text {}:",
            "!".yellow(),
            scan.unrecognized.len(),
            handling
        );
        print_truncated(&scan.unrecognized, |u| format!("{}: \"{}\"", u.id, u.raw));
    }
    if !scan.failures.is_empty() {
        println!("   {} {} unreadable documents", "!".yellow(), scan.failures.len());
    }
    println!();

    if report.is_clean() {
        println!("{} Ledger matches all scanned stories.", "OK".green().bold());
        return;
    }

    println!(
        "{} {} discrepancies:",
        "DRIFT".yellow().bold(),
        report.discrepancies.len()
    );
    print_truncated(&report.discrepancies, |d| {
        format!("{}: {} → {}", d.id, d.ledger, d.scanned)
    });
    println!();

    match report.mode {
        SyncMode::Validate => {
            println!("Run {} to update the ledger.", "story sync --mode fix".cyan());
        }
        SyncMode::DryRun => {
            if let Some(preview) = &report.preview {
                print!("{preview}");
            }
            print_skipped(report);
            println!();
            println!("{} No files were modified.", "DRY RUN".yellow().bold());
        }
        SyncMode::Fix => {
            let applied = report.applied.as_ref().map_or(0, |a| a.applied.len());
            print_skipped(report);
            if let Some(backup) = &report.backup {
                println!("   Backup: {}", backup.dimmed());
            }
            if report.written {
                println!(
                    "{} Updated {} entries in {}",
                    "OK".green().bold(),
                    applied,
                    report.ledger
                );
            }
        }
    }
}

fn print_skipped(report: &SyncReport) {
    let Some(applied) = &report.applied else {
        return;
    };
    if applied.skipped.is_empty() {
        return;
    }
    println!(
        "{} {} entries could not be written:",
        "SKIPPED".yellow().bold(),
        applied.skipped.len()
    );
    print_truncated(&applied.skipped, |s| format!("{}: {}", s.id, s.reason));
}
