//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline. Filters
//! either rewrite its text or drop it from the stream.
//!
//! ```
//! use spamkit::analysis::token::Token;
//!
//! let token = Token::new("Cash").with_text("cash");
//! assert_eq!(token.text, "cash");
//! assert_eq!(token.len(), 4);
//! ```

use std::fmt;

/// A token represents a single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The text content of the token
    pub text: String,
}

impl Token {
    /// Create a new token with the given text.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token { text: text.into() }
    }

    /// Get the length of the token text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the text.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
