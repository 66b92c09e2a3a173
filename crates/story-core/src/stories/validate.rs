//! Structural checks that catch broken story documents before anyone
//! starts implementing from them

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use story_fs::{NormalizedPath, io};
use story_meta::ValidationConfig;

use super::checkbox::CheckboxCounts;
use super::preview;
use super::repetition::repeated_paragraphs;

/// Template text left behind when a story was not filled in.
pub const PLACEHOLDERS: [&str; 5] = ["[Add technical notes]", "[TODO", "TBD", "[PLACEHOLDER]", "FIXME"];

/// Sections every story must contain.
pub const REQUIRED_SECTIONS: [&str; 4] = ["## Story", "## Acceptance Criteria", "## Tasks", "## Dev Notes"];

/// Fewer Given/When/Then markers than this is a warning.
pub const MIN_CRITERIA_MARKERS: usize = 5;

static CRITERIA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Given\*\*|\*\*When\*\*|\*\*Then\*\*").expect("Invalid criteria marker regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// One problem in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: String,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn critical(file: &str, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            severity: Severity::Critical,
            message: message.into(),
        }
    }

    fn warning(file: &str, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Run every content check on an already-read document of `size` bytes.
pub fn check_content(file: &str, content: &str, size: u64, config: &ValidationConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    if size < config.min_file_size {
        findings.push(Finding::critical(
            file,
            format!("file too small: {size} bytes (minimum: {} bytes)", config.min_file_size),
        ));
    } else if size < config.recommended_size {
        findings.push(Finding::warning(
            file,
            format!(
                "file below recommended size: {size} bytes (recommended: {} bytes)",
                config.recommended_size
            ),
        ));
    }

    for repetition in repeated_paragraphs(content, config.max_repetitions) {
        findings.push(Finding::critical(
            file,
            format!(
                "repetitive content: paragraph appears {} times: \"{}\"",
                repetition.count,
                preview(&repetition.text, 80)
            ),
        ));
    }

    let boxes = CheckboxCounts::of(content);
    if boxes.total() == 0 {
        findings.push(Finding::critical(file, "no task checkboxes found"));
    } else if boxes.total() < config.min_tasks {
        findings.push(Finding::warning(
            file,
            format!("too few tasks: {} (minimum: {})", boxes.total(), config.min_tasks),
        ));
    }
    if boxes.checked > 0 {
        findings.push(Finding::critical(
            file,
            format!(
                "found {} checked boxes, all should be unchecked ({:.1}% of tasks marked complete)",
                boxes.checked,
                boxes.checked_percent()
            ),
        ));
    }

    for placeholder in PLACEHOLDERS {
        if content.contains(placeholder) {
            findings.push(Finding::warning(
                file,
                format!("template placeholder not filled: \"{placeholder}\""),
            ));
        }
    }

    for section in REQUIRED_SECTIONS {
        if !content.contains(section) {
            findings.push(Finding::critical(file, format!("missing required section: {section}")));
        }
    }

    let markers = CRITERIA_REGEX.find_iter(content).count();
    if markers < MIN_CRITERIA_MARKERS {
        findings.push(Finding::warning(
            file,
            format!("too few acceptance criteria markers: {markers} (minimum: {MIN_CRITERIA_MARKERS})"),
        ));
    }

    findings
}

/// Validate one document on disk.
///
/// An unreadable document yields a single critical finding.
pub fn validate_story(path: &NormalizedPath, config: &ValidationConfig) -> Vec<Finding> {
    let file = path.file_name().unwrap_or(path.as_str());
    match io::read_text(path) {
        Ok(content) => {
            let size = io::file_size(path).unwrap_or(content.len() as u64);
            check_content(file, &content, size, config)
        }
        Err(e) => vec![Finding::critical(file, format!("failed to read file: {e}"))],
    }
}

/// Totals over a validation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    pub total_files: usize,
    pub valid_files: usize,
    pub files_with_findings: usize,
    pub critical: usize,
    pub warnings: usize,
    pub total_size: u64,
    pub average_size: u64,
}

/// Findings of a validation run, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub stats: ValidationStats,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn has_critical(&self) -> bool {
        self.stats.critical > 0
    }

    pub fn critical(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Critical)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }
}

/// Validate every document in `files`.
pub fn validate_stories(files: &[NormalizedPath], config: &ValidationConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    for path in files {
        let stats = &mut report.stats;
        stats.total_files += 1;
        stats.total_size += io::file_size(path).unwrap_or(0);

        let findings = validate_story(path, config);
        if findings.is_empty() {
            stats.valid_files += 1;
            continue;
        }

        stats.files_with_findings += 1;
        for finding in &findings {
            match finding.severity {
                Severity::Critical => stats.critical += 1,
                Severity::Warning => stats.warnings += 1,
                Severity::Info => {}
            }
        }
        tracing::debug!(file = %path, findings = findings.len(), "story has findings");
        report.findings.extend(findings);
    }

    if report.stats.total_files > 0 {
        report.stats.average_size = report.stats.total_size / report.stats.total_files as u64;
    }
    report
}
