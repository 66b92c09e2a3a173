//! Story validation command

use colored::Colorize;
use story_core::stories::{Finding, ValidationReport, validate_stories};
use story_meta::Workspace;

use super::selected_files;
use crate::error::Result;
use crate::report::{Outcome, print_header, print_json, print_truncated};

/// Run the validate command.
///
/// Fails when any critical finding exists; warnings never affect the exit
/// code and are only listed with `verbose`.
pub fn run_validate(
    workspace: &Workspace,
    epic: Option<&str>,
    summary_only: bool,
    verbose: bool,
    json: bool,
) -> Result<Outcome> {
    let files = selected_files(workspace, epic)?;
    let report = validate_stories(&files, &workspace.validation);
    let outcome = Outcome::from_clean(!report.has_critical());

    if json {
        print_json(&report)?;
        return Ok(outcome);
    }

    print_header(&format!("Validating {} story documents", files.len()));
    if !summary_only {
        print_findings(&report, verbose);
    }
    print_summary(&report);

    if report.has_critical() {
        println!();
        println!("{} Story documents need attention.", "FAILED".red().bold());
    } else {
        println!();
        println!("{} All story documents passed validation.", "OK".green().bold());
    }
    Ok(outcome)
}

fn print_findings(report: &ValidationReport, verbose: bool) {
    let critical: Vec<&Finding> = report.critical().collect();
    if !critical.is_empty() {
        println!();
        println!("{} ({}):", "CRITICAL".red().bold(), critical.len());
        print_truncated(&critical, |f| f.to_string());
    }

    let warnings: Vec<&Finding> = report.warnings().collect();
    if verbose && !warnings.is_empty() {
        println!();
        println!("{} ({}):", "WARNING".yellow().bold(), warnings.len());
        for finding in warnings {
            println!("   {finding}");
        }
    }
}

fn print_summary(report: &ValidationReport) {
    let stats = &report.stats;
    println!();
    println!("{}", "Validation summary".bold());
    println!("   Total files scanned:  {}", stats.total_files);
    println!("   Valid files:          {}", stats.valid_files);
    println!("   Files with findings:  {}", stats.files_with_findings);
    println!("   Critical findings:    {}", stats.critical);
    println!("   Warnings:             {}", stats.warnings);
    println!("   Average file size:    {} KB", stats.average_size / 1024);
}
