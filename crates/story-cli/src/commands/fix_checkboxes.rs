//! Checkbox reset command

use colored::Colorize;
use story_core::stories::reset_checkboxes;
use story_meta::Workspace;

use super::selected_files;
use crate::error::Result;
use crate::report::{Outcome, print_header, print_truncated};

/// Run the fix-checkboxes command; documents are only written with `apply`.
pub fn run_fix_checkboxes(workspace: &Workspace, epic: Option<&str>, apply: bool) -> Result<Outcome> {
    let files = selected_files(workspace, epic)?;
    print_header(&format!("Resetting checkboxes in {} story documents", files.len()));

    let report = reset_checkboxes(&files, apply)?;
    for change in &report.changes {
        if apply {
            println!("   {} Unchecked {} boxes in {}", "+".green(), change.unchecked, change.file);
        } else {
            println!("   Would uncheck {} boxes in {}", change.unchecked, change.file);
        }
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
    if apply {
        println!(
            "{} Modified {} files, unchecked {} boxes.",
            "OK".green().bold(),
            report.changes.len(),
            report.total_unchecked
        );
    } else {
        println!(
            "{} Would modify {} files, unchecking {} boxes. Run with {} to write.",
            "DRY RUN".yellow().bold(),
            report.changes.len(),
            report.total_unchecked,
            "--apply".cyan()
        );
    }
    Ok(Outcome::Clean)
}
