//! Text analysis for message normalization.
//!
//! Raw SMS text flows through a char filter, a tokenizer and a chain of token
//! filters before it is joined back into a cleaned document:
//!
//! ```text
//! Raw Text → PatternReplace → Whitespace → Lowercase → Stop → Stem → RemoveEmpty
//! ```
//!
//! [`TextNormalizer`](analyzer::TextNormalizer) wires the default chain
//! together and is what every pipeline consumes.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, TextNormalizer};
pub use token::{Token, TokenStream};
