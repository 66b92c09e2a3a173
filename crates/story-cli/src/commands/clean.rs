//! Repetition cleanup command

use colored::Colorize;
use story_core::stories::{clean_repetitions, preview};
use story_meta::Workspace;

use super::selected_files;
use crate::error::Result;
use crate::report::{Outcome, print_header, print_truncated};

/// Paragraph previews are cut to this many characters.
const PREVIEW_CHARS: usize = 60;

/// Run the clean command over one epic, or every story when `epic` is
/// `None` (`--all`).
pub fn run_clean(workspace: &Workspace, epic: Option<&str>, dry_run: bool) -> Result<Outcome> {
    let files = selected_files(workspace, epic)?;
    let scope = epic.map_or_else(|| "all".to_string(), |e| e.to_string());
    print_header(&format!("Cleaning {} story documents ({scope})", files.len()));

    let report = clean_repetitions(&files, !dry_run)?;
    for cleaned in &report.cleaned {
        let verb = if dry_run { "Would remove" } else { "Removed" };
        println!("   {verb} {} repetitions from {}", cleaned.removed, cleaned.file.cyan());
        for repetition in &cleaned.repetitions {
            println!(
                "     - '{}' appears {} times",
                preview(&repetition.text, PREVIEW_CHARS),
                repetition.count
            );
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
    let label = if dry_run { "DRY RUN".yellow().bold() } else { "OK".green().bold() };
    println!(
        "{label} Files processed: {}, with repetitions: {}, repetitions removed: {}",
        report.files_processed,
        report.cleaned.len(),
        report.total_removed
    );
    Ok(Outcome::Clean)
}
