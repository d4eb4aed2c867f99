//! Token filter implementations for token transformation.
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`stop::StopFilter`] - Removes stop words
//! - [`stem::StemFilter`] - Reduces words to their stem form
//! - [`remove_empty::RemoveEmptyFilter`] - Removes empty tokens
//!
//! Filters are chained by an analyzer:
//!
//! ```text
//! Tokenizer → Lowercase → Stop Words → Stemmer → RemoveEmpty
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod remove_empty;
pub mod stem;
pub mod stop;

pub use lowercase::LowercaseFilter;
pub use remove_empty::RemoveEmptyFilter;
pub use stem::{PorterStemmer, StemFilter, Stemmer};
pub use stop::StopFilter;
