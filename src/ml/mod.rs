//! Learning components for the spam experiment.
//!
//! Data moves through these modules in one direction:
//!
//! ```text
//! cleaned corpus → vectorizer → FeatureMatrix → split → sampling → classifier → metrics
//! ```

pub mod classifier;
pub mod matrix;
pub mod metrics;
pub mod sampling;
pub mod split;
pub mod vectorizer;

pub use matrix::FeatureMatrix;

/// Machine learning error types.
#[derive(Debug, thiserror::Error)]
pub enum MLError {
    #[error("Model not trained: {message}")]
    ModelNotTrained { message: String },

    #[error("Invalid feature vector: {message}")]
    InvalidFeatureVector { message: String },

    #[error("Insufficient minority samples: need at least {required}, got {actual}")]
    InsufficientMinoritySamples { required: usize, actual: usize },

    #[error("Invalid sampling ratio: {message}")]
    InvalidSamplingRatio { message: String },

    #[error("Negative feature value {value} at row {row}, column {column}")]
    NegativeFeature { row: usize, column: usize, value: f32 },

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl MLError {
    /// Create a model-not-trained error for the named component.
    pub fn not_trained<S: Into<String>>(component: S) -> Self {
        MLError::ModelNotTrained {
            message: format!("{} must be fitted first", component.into()),
        }
    }

    /// Create an invalid feature vector error.
    pub fn invalid_features<S: Into<String>>(message: S) -> Self {
        MLError::InvalidFeatureVector {
            message: message.into(),
        }
    }

    /// Create an invalid sampling ratio error.
    pub fn invalid_ratio<S: Into<String>>(message: S) -> Self {
        MLError::InvalidSamplingRatio {
            message: message.into(),
        }
    }
}
