//! Restricting work to one epic's stories

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// `epic-<n>` or a bare `<n>`; the number may carry letter or dash suffixes.
static EPIC_ARG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:epic-)?([0-9][0-9a-z-]*)$").expect("Invalid epic argument regex")
});

/// Selects stories whose id starts with `<number>-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicFilter {
    number: String,
}

impl EpicFilter {
    /// Parse a command-line epic argument (`epic-7`, `7`, `19a`).
    ///
    /// Returns `None` for anything else so callers can warn and carry on
    /// unfiltered.
    pub fn parse(arg: &str) -> Option<Self> {
        let caps = EPIC_ARG_REGEX.captures(arg.trim())?;
        let number = caps.get(1)?.as_str().trim_end_matches('-');
        Some(Self {
            number: number.to_string(),
        })
    }

    /// Parse, logging a warning when the argument is not an epic reference.
    pub fn parse_or_warn(arg: &str) -> Option<Self> {
        let filter = Self::parse(arg);
        if filter.is_none() {
            tracing::warn!(epic = arg, "invalid epic format, continuing without a filter");
        }
        filter
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// The ledger key of this epic.
    pub fn epic_key(&self) -> String {
        format!("epic-{}", self.number)
    }

    pub fn matches(&self, id: &str) -> bool {
        id.strip_prefix(self.number.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

impl fmt::Display for EpicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epic-{}", self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("epic-1", "1")]
    #[case("7", "7")]
    #[case("epic-19a", "19a")]
    #[case(" epic-3 ", "3")]
    fn test_parse(#[case] arg: &str, #[case] number: &str) {
        assert_eq!(EpicFilter::parse(arg).unwrap().number(), number);
    }

    #[rstest]
    #[case("")]
    #[case("epic-")]
    #[case("Epic One")]
    #[case("epic-x")]
    fn test_parse_rejects(#[case] arg: &str) {
        assert_eq!(EpicFilter::parse(arg), None);
    }

    #[test]
    fn test_matches_prefix_with_dash_only() {
        let filter = EpicFilter::parse("epic-1").unwrap();
        assert!(filter.matches("1-a-foo"));
        assert!(!filter.matches("10-a-foo"));
        assert!(!filter.matches("1"));
        assert!(!filter.matches("21-a-foo"));
    }

    #[test]
    fn test_display_and_key() {
        let filter = EpicFilter::parse("4").unwrap();
        assert_eq!(filter.to_string(), "epic-4");
        assert_eq!(filter.epic_key(), "epic-4");
    }
}
