//! Error types for the spamkit library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`SpamkitError`] enum. Learning-specific failures (untrained models,
//! shape mismatches, oversampling preconditions) are carried by
//! [`MLError`](crate::ml::MLError) and wrapped transparently.
//!
//! # Examples
//!
//! ```
//! use spamkit::error::{Result, SpamkitError};
//!
//! fn load() -> Result<()> {
//!     Err(SpamkitError::dataset("missing column 'v1'"))
//! }
//!
//! match load() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::ml::MLError;

/// The main error type for spamkit operations.
#[derive(Error, Debug)]
pub enum SpamkitError {
    /// I/O errors (dataset files, stopword lists, config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed dataset (missing columns, unknown labels)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid experiment or pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model fitting, resampling and evaluation errors
    #[error(transparent)]
    ML(#[from] MLError),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SpamkitError.
pub type Result<T> = std::result::Result<T, SpamkitError>;

impl SpamkitError {
    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        SpamkitError::Dataset(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SpamkitError::Analysis(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SpamkitError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SpamkitError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SpamkitError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
