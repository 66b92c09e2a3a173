//! Recognition of individual ledger lines

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::SECTION_HEADER;

/// `  <key>: <status><rest>` where rest usually holds `  # comment`.
///
/// The key is everything up to the first colon, so any id written by
/// [`render_new_entry`] parses back.
static ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<indent>[ \t]+)(?P<key>[^\s:#][^\s:]*):(?P<sep>[ \t]*)(?P<status>[^\s#]+)(?P<rest>.*)$",
    )
    .expect("Invalid entry regex")
});

/// Leading `<digits>[letter]-` of a story id names its epic.
static EPIC_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[a-z]?)-").expect("Invalid epic prefix regex"));

/// A ledger line split into its entry fields.
///
/// Slices borrow from the original line; `crlf` records a trailing `\r`
/// that is restored when the line is rendered again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLine<'a> {
    pub indent: &'a str,
    pub key: &'a str,
    pub separator: &'a str,
    pub status: &'a str,
    /// Everything after the status, trailing comment included
    pub rest: &'a str,
    pub crlf: bool,
}

impl<'a> EntryLine<'a> {
    /// Parse an indented `key: status` line.
    pub fn parse(line: &'a str) -> Option<Self> {
        let (body, crlf) = split_cr(line);
        let caps = ENTRY_REGEX.captures(body)?;
        let field = |name: &str| caps.name(name).map_or("", |m| m.as_str());
        Some(Self {
            indent: field("indent"),
            key: field("key"),
            separator: field("sep"),
            status: field("status"),
            rest: field("rest"),
            crlf,
        })
    }

    /// The trailing comment text without its `#`, if any.
    pub fn comment(&self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        trimmed.strip_prefix('#').map(str::trim)
    }

    /// Render with a new status.
    ///
    /// `Some(comment)` replaces whatever followed the old status; `None`
    /// keeps it verbatim.
    pub fn render(&self, status: &str, comment: Option<&str>) -> String {
        let separator = if self.separator.is_empty() {
            " "
        } else {
            self.separator
        };
        let mut out = match comment {
            Some(comment) => format!(
                "{}{}:{}{}  # {}",
                self.indent, self.key, separator, status, comment
            ),
            None => format!(
                "{}{}:{}{}{}",
                self.indent, self.key, separator, status, self.rest
            ),
        };
        if self.crlf {
            out.push('\r');
        }
        out
    }
}

/// Render a brand new entry line.
pub fn render_new_entry(
    indent: &str,
    key: &str,
    status: &str,
    comment: Option<&str>,
    crlf: bool,
) -> String {
    let mut out = match comment {
        Some(comment) => format!("{indent}{key}: {status}  # {comment}"),
        None => format!("{indent}{key}: {status}"),
    };
    if crlf {
        out.push('\r');
    }
    out
}

/// The `epic-<n>` key owning `id`, from its leading numeric prefix.
pub fn epic_key_for(id: &str) -> Option<String> {
    EPIC_PREFIX_REGEX
        .captures(id)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("epic-{}", m.as_str()))
}

/// Leading whitespace of a line.
pub(crate) fn indent_of(line: &str) -> &str {
    let body = split_cr(line).0;
    &body[..body.len() - body.trim_start().len()]
}

/// Strip a trailing carriage return.
pub(crate) fn split_cr(line: &str) -> (&str, bool) {
    match line.strip_suffix('\r') {
        Some(body) => (body, true),
        None => (line, false),
    }
}

/// Lines that carry no entry and never end the section.
pub(crate) fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Body of the `development_status:` section as a range of line indices.
///
/// The section runs from the line after the header up to the first line
/// that is non-blank, not a comment and not indented.
pub fn section_range(lines: &[String]) -> Option<Range<usize>> {
    let header = lines
        .iter()
        .position(|line| split_cr(line).0.trim_end() == SECTION_HEADER)?;

    let start = header + 1;
    let end = lines[start..]
        .iter()
        .position(|line| {
            let (body, _) = split_cr(line);
            !body.trim().is_empty()
                && !body.starts_with('#')
                && !body.starts_with(' ')
                && !body.starts_with('\t')
        })
        .map_or(lines.len(), |offset| start + offset);

    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(String::from).collect()
    }

    #[test]
    fn test_parse_entry_with_comment() {
        let entry = EntryLine::parse("  1-a-foo: ready-for-dev  # note").unwrap();
        assert_eq!(entry.indent, "  ");
        assert_eq!(entry.key, "1-a-foo");
        assert_eq!(entry.status, "ready-for-dev");
        assert_eq!(entry.rest, "  # note");
        assert_eq!(entry.comment(), Some("note"));
        assert!(!entry.crlf);
    }

    #[rstest]
    #[case("  1-a-café: done", "1-a-café")]
    #[case("  1-a-foo+x: done", "1-a-foo+x")]
    #[case("  setup_tooling: done", "setup_tooling")]
    fn test_keys_outside_ascii_word_chars(#[case] line: &str, #[case] key: &str) {
        let entry = EntryLine::parse(line).unwrap();
        assert_eq!(entry.key, key);
        assert_eq!(entry.status, "done");
    }

    #[test]
    fn test_indent_of() {
        assert_eq!(indent_of("    epic-1:\r"), "    ");
        assert_eq!(indent_of("\tepic-1: done"), "\t");
        assert_eq!(indent_of("epic-1:"), "");
    }

    #[rstest]
    #[case("  1-a foo: done")]
    #[case("development_status:")]
    #[case("  # comment only")]
    #[case("  1-a-foo:")]
    #[case("  1-a-foo:   # status missing")]
    #[case("1-a-foo: done")]
    #[case("")]
    fn test_non_entries(#[case] line: &str) {
        assert!(EntryLine::parse(line).is_none(), "{line:?}");
    }

    #[test]
    fn test_render_keeps_rest_without_comment() {
        let entry = EntryLine::parse("    1-a-foo:   backlog   # keep me").unwrap();
        assert_eq!(
            entry.render("done", None),
            "    1-a-foo:   done   # keep me"
        );
    }

    #[test]
    fn test_render_replaces_comment() {
        let entry = EntryLine::parse("  1-a-foo: backlog # old").unwrap();
        assert_eq!(
            entry.render("done", Some("Updated 2026-01-02")),
            "  1-a-foo: done  # Updated 2026-01-02"
        );
    }

    #[test]
    fn test_crlf_is_preserved() {
        let entry = EntryLine::parse("  1-a-foo: backlog\r").unwrap();
        assert_eq!(entry.status, "backlog");
        assert_eq!(entry.render("done", None), "  1-a-foo: done\r");
    }

    #[rstest]
    #[case("1-a-foo", Some("epic-1"))]
    #[case("19-4a-inventory", Some("epic-19"))]
    #[case("7b-2-login", Some("epic-7b"))]
    #[case("H-1-hardening", None)]
    #[case("12", None)]
    fn test_epic_key_for(#[case] id: &str, #[case] expected: Option<&str>) {
        assert_eq!(epic_key_for(id).as_deref(), expected);
    }

    #[test]
    fn test_section_range_stops_at_unindented_line() {
        let text = lines(
            "# header\ndevelopment_status:\n  epic-1: done\n\n# note\n  1-a: done\nother_key: x\n  2-a: done",
        );
        assert_eq!(section_range(&text), Some(2..6));
    }

    #[test]
    fn test_section_range_runs_to_eof() {
        let text = lines("development_status:\n  epic-1: done\n");
        assert_eq!(section_range(&text), Some(1..3));
    }

    #[test]
    fn test_section_missing() {
        let text = lines("project: demo\n");
        assert_eq!(section_range(&text), None);
    }
}
