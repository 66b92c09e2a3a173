//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use story_core::SyncMode;

/// Storyline - keep story documents and the sprint status ledger in step
#[derive(Parser, Debug)]
#[command(name = "story")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base directory all relative paths resolve against
    #[arg(long, global = true, env = "STORYLINE_ROOT")]
    pub root: Option<PathBuf>,

    /// Story document directory, overriding the configuration
    #[arg(long, global = true)]
    pub story_dir: Option<String>,

    /// Sprint status ledger, overriding the configuration
    #[arg(long, global = true)]
    pub sprint_status: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// `--mode` values for sync
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Validate,
    Fix,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile story statuses with the sprint status ledger
    ///
    /// Examples:
    ///   story sync                 # Report discrepancies (exit 1 if any)
    ///   story sync --dry-run       # Show the ledger diff a fix would make
    ///   story sync --mode fix      # Back up and rewrite the ledger
    ///   story sync --epic epic-7   # Only stories of epic 7
    Sync {
        /// Report only; takes precedence over the other mode flags
        #[arg(long)]
        validate: bool,

        /// Preview the ledger changes without writing
        #[arg(long)]
        dry_run: bool,

        /// What to do with discrepancies
        #[arg(long, value_enum, default_value = "validate")]
        mode: ModeArg,

        /// Restrict to one epic (`epic-7` or `7`)
        #[arg(long)]
        epic: Option<String>,

        /// Skip documents whose status text is not recognized
        #[arg(long)]
        strict: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Check story documents for structural problems
    Validate {
        /// Restrict to one epic (`epic-7` or `7`)
        #[arg(long)]
        epic: Option<String>,

        /// Show the summary only
        #[arg(short, long)]
        summary: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Uncheck every task checkbox in story documents
    FixCheckboxes {
        /// Restrict to one epic (`epic-7` or `7`)
        #[arg(long)]
        epic: Option<String>,

        /// Write the changes; without this only a preview is shown
        #[arg(long)]
        apply: bool,
    },

    /// Remove repeated paragraphs from story documents
    #[command(group(ArgGroup::new("scope").required(true).args(["epic", "all"])))]
    Clean {
        /// Clean one epic (`epic-7` or `7`)
        #[arg(long)]
        epic: Option<String>,

        /// Clean every story document
        #[arg(long)]
        all: bool,

        /// Preview changes without modifying files
        #[arg(long)]
        dry_run: bool,
    },

    /// Add the ledger status to story documents without a status marker
    Backfill {
        /// Preview changes without modifying files
        #[arg(long)]
        dry_run: bool,
    },
}

/// Resolve the sync mode: `--validate` wins over `--dry-run`, which wins
/// over `--mode`.
pub fn resolve_sync_mode(validate: bool, dry_run: bool, mode: ModeArg) -> SyncMode {
    if validate {
        SyncMode::Validate
    } else if dry_run {
        SyncMode::DryRun
    } else {
        match mode {
            ModeArg::Validate => SyncMode::Validate,
            ModeArg::Fix => SyncMode::Fix,
        }
    }
}
