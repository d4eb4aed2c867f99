//! # spamkit
//!
//! Classical SMS spam classification experiments.
//!
//! A labeled message collection is cleaned once (letters only, lowercase,
//! stopwords removed, Porter-stemmed), then each configured pipeline turns
//! the cleaned corpus into features, rebalances the training rows with SMOTE,
//! fits a classifier and reports accuracy plus per-class precision, recall
//! and F1.
//!
//! ## Features
//!
//! - Token-count, TF-IDF and TF-IDF bigram bag-of-words features
//! - Mean Word2Vec (CBOW) document embeddings
//! - SMOTE minority oversampling
//! - Multinomial naive Bayes and random forest classifiers
//! - Deterministic, seeded runs
//!
//! ```no_run
//! use spamkit::config::ExperimentConfig;
//! use spamkit::dataset::Dataset;
//! use spamkit::pipeline::run_experiment;
//!
//! let dataset = Dataset::load("spam.csv")?;
//! let report = run_experiment(&ExperimentConfig::default(), &dataset)?;
//! println!("{report}");
//! # Ok::<(), spamkit::error::SpamkitError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ml;
pub mod pipeline;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
