//! Lowercase filter implementation.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that converts tokens to lowercase.
///
/// ```
/// use spamkit::analysis::token_filter::Filter;
/// use spamkit::analysis::token_filter::lowercase::LowercaseFilter;
/// use spamkit::analysis::token::Token;
///
/// let filter = LowercaseFilter::new();
/// let tokens = vec![Token::new("FREE"), Token::new("Entry")];
/// let result: Vec<_> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
///
/// assert_eq!(result[0].text, "free");
/// assert_eq!(result[1].text, "entry");
/// ```
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                let lowered = token.text.to_lowercase();
                token.with_text(lowered)
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
