//! Status backfill command

use colored::Colorize;
use story_core::stories::backfill_status_fields;
use story_ledger::SprintLedger;
use story_meta::Workspace;

use crate::error::Result;
use crate::report::{Outcome, print_header, print_truncated};

/// Run the backfill command, taking statuses from the ledger.
pub fn run_backfill(workspace: &Workspace, dry_run: bool) -> Result<Outcome> {
    let ledger = SprintLedger::load(workspace.sprint_status.clone())?;
    print_header(&format!("Backfilling status markers from {}", ledger.path()));

    let report = backfill_status_fields(&workspace.story_dir, &ledger, !dry_run)?;

    let verb = if dry_run { "Would add" } else { "Added" };
    for story in &report.added {
        println!("   {} {}: {verb} Status: {}", "+".green(), story.id, story.status);
    }
    if !report.missing_from_ledger.is_empty() {
        println!();
        println!(
            "{} {} stories not in the ledger:",
            "!".yellow().bold(),
            report.missing_from_ledger.len()
        );
        print_truncated(&report.missing_from_ledger, |id| id.clone());
    }

    if !report.unreadable.is_empty() {
        println!();
        println!(
            "{} {} unreadable documents skipped:",
            "!".yellow().bold(),
            report.unreadable.len()
        );
        print_truncated(&report.unreadable, |u| format!("{}: {}", u.file, u.message));
    }

    println!();
    let label = if dry_run { "DRY RUN".yellow().bold() } else { "OK".green().bold() };
    println!(
        "{label} {verb} status to {} stories, {} already had one.",
        report.added.len(),
        report.already_marked
    );
    Ok(Outcome::Clean)
}
