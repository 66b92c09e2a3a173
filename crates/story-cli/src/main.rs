//! Storyline CLI
//!
//! Keeps story documents and the sprint status ledger consistent.

mod cli;
mod commands;
mod context;
mod error;
mod report;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, resolve_sync_mode};
use context::resolve_workspace;
use error::Result;
use report::Outcome;

fn main() {
    match run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Install the stderr subscriber; `--verbose` forces debug, otherwise
/// `RUST_LOG` or warn.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("Verbose mode enabled");

    let workspace = resolve_workspace(
        cli.root.as_deref(),
        cli.story_dir.clone(),
        cli.sprint_status.clone(),
    )?;

    match cli.command {
        Commands::Sync {
            validate,
            dry_run,
            mode,
            epic,
            strict,
            json,
        } => commands::run_sync(
            &workspace,
            resolve_sync_mode(validate, dry_run, mode),
            epic,
            strict,
            json,
        ),
        Commands::Validate {
            epic,
            summary,
            json,
        } => commands::run_validate(&workspace, epic.as_deref(), summary, cli.verbose, json),
        Commands::FixCheckboxes { epic, apply } => {
            commands::run_fix_checkboxes(&workspace, epic.as_deref(), apply)
        }
        Commands::Clean { epic, all: _, dry_run } => {
            commands::run_clean(&workspace, epic.as_deref(), dry_run)
        }
        Commands::Backfill { dry_run } => commands::run_backfill(&workspace, dry_run),
    }
}
