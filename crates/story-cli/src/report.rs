//! Shared output helpers and exit codes

use colored::Colorize;

/// Lists longer than this are cut with "... and N more".
pub const PREVIEW_LIMIT: usize = 20;

/// How a successful run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report, or the requested change was made
    Clean,
    /// Discrepancies or critical findings were reported
    Findings,
}

impl Outcome {
    pub fn from_clean(clean: bool) -> Self {
        if clean { Self::Clean } else { Self::Findings }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Findings => 1,
        }
    }
}

/// The first [`PREVIEW_LIMIT`] rendered items, plus a trailer line when
/// some were left out.
pub fn truncated<T>(items: &[T], render: impl Fn(&T) -> String) -> Vec<String> {
    let mut lines: Vec<String> = items.iter().take(PREVIEW_LIMIT).map(render).collect();
    if items.len() > PREVIEW_LIMIT {
        lines.push(format!("... and {} more", items.len() - PREVIEW_LIMIT));
    }
    lines
}

pub fn print_truncated<T>(items: &[T], render: impl Fn(&T) -> String) {
    for line in truncated(items, render) {
        println!("   {line}");
    }
}

pub fn print_header(message: &str) {
    println!("{} {}", "=>".blue().bold(), message);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> crate::error::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
