//! Message normalizer used by every pipeline.
//!
//! Wraps a [`PipelineAnalyzer`] with the fixed cleaning chain for SMS text
//! and joins the surviving tokens back into a single document string.

use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::PatternReplaceCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{LowercaseFilter, RemoveEmptyFilter, StemFilter, StopFilter};
use crate::analysis::tokenizer::WhitespaceTokenizer;
use crate::error::Result;

/// Cleans raw messages into lowercase, stopword-free, stemmed documents.
///
/// # Examples
///
/// ```
/// use spamkit::analysis::TextNormalizer;
///
/// let normalizer = TextNormalizer::new().unwrap();
/// assert_eq!(normalizer.normalize("WIN CASH NOW click here").unwrap(), "win cash click");
/// ```
pub struct TextNormalizer {
    inner: PipelineAnalyzer,
}

impl TextNormalizer {
    /// Create a normalizer with the bundled English stopword list.
    pub fn new() -> Result<Self> {
        Self::with_stop_filter(StopFilter::new())
    }

    /// Create a normalizer with the given stop filter.
    pub fn with_stop_filter(stop_filter: StopFilter) -> Result<Self> {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::non_alphabetic()?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(stop_filter))
            .add_filter(Arc::new(StemFilter::new()))
            .add_filter(Arc::new(RemoveEmptyFilter::new()))
            .with_name("sms_normalizer");

        Ok(TextNormalizer { inner: analyzer })
    }

    /// Create a normalizer whose stopwords are read from a file.
    pub fn from_stopwords_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_stop_filter(StopFilter::from_file(path)?)
    }

    /// Create a normalizer from an optional stopword file path.
    pub fn from_optional_stopwords<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::from_stopwords_file(path),
            None => Self::new(),
        }
    }

    /// Normalize one message into a space-joined document.
    ///
    /// An empty string is a valid result.
    pub fn normalize(&self, text: &str) -> Result<String> {
        let tokens: Vec<String> = self.inner.analyze(text)?.map(|token| token.text).collect();
        Ok(tokens.join(" "))
    }

    /// Normalize every message, keeping input order.
    pub fn normalize_corpus<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<Vec<String>> {
        let documents = texts
            .par_iter()
            .map(|text| self.normalize(text.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let empty = documents.iter().filter(|doc| doc.is_empty()).count();
        if empty > 0 {
            log::debug!("{} of {} documents are empty after cleaning", empty, documents.len());
        }
        Ok(documents)
    }
}

impl Analyzer for TextNormalizer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "sms_normalizer"
    }
}

impl Debug for TextNormalizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_scenario_messages() {
        let normalizer = TextNormalizer::new().unwrap();

        assert_eq!(normalizer.normalize("Hello how are you").unwrap(), "hello");
        assert_eq!(
            normalizer.normalize("WIN CASH NOW click here").unwrap(),
            "win cash click"
        );
    }

    #[test]
    fn test_output_alphabet() {
        let normalizer = TextNormalizer::new().unwrap();
        let samples = [
            "Free entry in 2 a wkly comp to win FA Cup final tkts 21st May 2005.",
            "U dun say so early hor... U c already then say...",
            "  Nah I don't think he goes to usf, he lives around here though  ",
            "£1000 cash or a £2000 prize!! Txt CLAIM to 81010",
        ];

        for sample in samples {
            let cleaned = normalizer.normalize(sample).unwrap();
            assert!(cleaned.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
            assert!(!cleaned.contains("  "));
            assert!(!cleaned.starts_with(' ') && !cleaned.ends_with(' '));
        }
    }

    #[test]
    fn test_empty_results() {
        let normalizer = TextNormalizer::new().unwrap();

        assert_eq!(normalizer.normalize("").unwrap(), "");
        assert_eq!(normalizer.normalize("12345 !!! ???").unwrap(), "");
        assert_eq!(normalizer.normalize("I am the one who is").unwrap(), "one");
        assert_eq!(normalizer.normalize("you are what you are").unwrap(), "");
    }

    #[test]
    fn test_stable_text_is_unchanged() {
        let normalizer = TextNormalizer::new().unwrap();

        let once = normalizer.normalize("hello world").unwrap();
        assert_eq!(once, "hello world");
        assert_eq!(normalizer.normalize(&once).unwrap(), once);
    }

    #[test]
    fn test_stemming_applied() {
        let normalizer = TextNormalizer::new().unwrap();
        assert_eq!(
            normalizer.normalize("Winning prizes, claiming rewards").unwrap(),
            "win prize claim reward"
        );
        assert_eq!(
            normalizer.normalize("Have a good day, see you today").unwrap(),
            "good day see today"
        );
    }

    #[test]
    fn test_normalize_corpus_keeps_order() {
        let normalizer = TextNormalizer::new().unwrap();
        let corpus = vec!["Hello how are you", "WIN CASH NOW click here", "!!!"];

        let cleaned = normalizer.normalize_corpus(&corpus).unwrap();
        assert_eq!(cleaned, vec!["hello", "win cash click", ""]);
    }

    #[test]
    fn test_custom_stopwords_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# custom list").unwrap();
        writeln!(file, "cash").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "CLICK").unwrap();

        let normalizer = TextNormalizer::from_stopwords_file(file.path()).unwrap();
        assert_eq!(
            normalizer.normalize("WIN CASH NOW click here").unwrap(),
            "win now here"
        );
    }

    #[test]
    fn test_missing_stopwords_file() {
        let result = TextNormalizer::from_stopwords_file("/nonexistent/stopwords.txt");
        assert!(result.is_err());
    }
}
