//! Char filters that rewrite raw text before tokenization.
//!
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement

pub mod pattern_replace;

pub use pattern_replace::PatternReplaceCharFilter;

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text and return the rewritten text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}
