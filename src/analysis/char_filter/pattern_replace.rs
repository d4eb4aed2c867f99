//! Regex replacement char filter.

use regex::Regex;

use super::CharFilter;
use crate::error::{Result, SpamkitError};

/// Pattern matching every character outside the English alphabet.
pub const NON_ALPHABETIC_PATTERN: &str = "[^a-zA-Z]";

/// A char filter that replaces every match of a regex pattern.
#[derive(Clone, Debug)]
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| SpamkitError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
        })
    }

    /// Replace each non-alphabetic character with a single space.
    pub fn non_alphabetic() -> Result<Self> {
        Self::new(NON_ALPHABETIC_PATTERN, " ")
    }

    /// Get the regex pattern used by this filter.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_replace() {
        let filter = PatternReplaceCharFilter::new(r"(\d+)", "NUM").unwrap();
        assert_eq!(filter.filter("Year 2024"), "Year NUM");
    }

    #[test]
    fn test_non_alphabetic_is_per_character() {
        let filter = PatternReplaceCharFilter::non_alphabetic().unwrap();
        assert_eq!(filter.filter("Call 0800!"), format!("Call{}", " ".repeat(6)));
        assert_eq!(filter.filter("£1.50/wk"), format!("{}wk", " ".repeat(6)));
        assert_eq!(filter.filter("café"), "caf ");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternReplaceCharFilter::new("(", "").unwrap_err();
        assert!(err.to_string().starts_with("Analysis error"));
    }
}
