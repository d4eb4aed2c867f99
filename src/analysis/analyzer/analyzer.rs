//! Core analyzer trait definition.
//!
//! An analyzer is the complete text processing chain, from raw text to a
//! stream of processed tokens:
//!
//! ```text
//! Raw Text → Char Filters → Tokenizer → Filter 1 → ... → Filter N → Tokens
//! ```
//!
//! # Examples
//!
//! ```
//! use spamkit::analysis::Analyzer;
//! use spamkit::analysis::TokenStream;
//! use spamkit::error::Result;
//!
//! struct EmptyAnalyzer;
//!
//! impl Analyzer for EmptyAnalyzer {
//!     fn analyze(&self, _text: &str) -> Result<TokenStream> {
//!         Ok(Box::new(std::iter::empty()))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "empty"
//!     }
//! }
//!
//! assert_eq!(EmptyAnalyzer.analyze("anything").unwrap().count(), 0);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so a single analyzer can be shared by the
/// parallel parts of a pipeline.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and logging).
    fn name(&self) -> &'static str;
}
