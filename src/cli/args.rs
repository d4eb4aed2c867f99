//! Command line argument parsing for the spamkit CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::FitScope;

/// spamkit - classical SMS spam classification pipelines
#[derive(Parser, Debug, Clone)]
#[command(name = "spamkit")]
#[command(about = "Compare bag-of-words, TF-IDF and Word2Vec spam classifiers with SMOTE rebalancing")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SpamkitArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SpamkitArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the configured pipelines over a labeled dataset
    Run(RunArgs),

    /// Show row count, columns and label distribution of a dataset
    Inspect(InspectArgs),

    /// Print the cleaned form of one or more messages
    Clean(CleanArgs),

    /// Print the default experiment configuration as JSON
    Config,
}

/// Arguments for running the experiment
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to the CSV dataset (columns v1 and v2)
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Experiment configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Run only the named pipeline (repeatable)
    #[arg(short, long = "pipeline", value_name = "NAME")]
    pub pipelines: Vec<String>,

    /// Newline-separated stopword list replacing the bundled English list
    #[arg(long, value_name = "FILE")]
    pub stopwords: Option<PathBuf>,

    /// Which documents the vectorizers are fitted on
    #[arg(long)]
    pub fit_scope: Option<FitScopeArg>,
}

/// Arguments for inspecting a dataset
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the CSV dataset
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,
}

/// Arguments for cleaning raw text
#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    /// Messages to clean
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,

    /// Newline-separated stopword list replacing the bundled English list
    #[arg(long, value_name = "FILE")]
    pub stopwords: Option<PathBuf>,
}

/// Vectorizer fit scope as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitScopeArg {
    /// Fit on the whole cleaned corpus
    Corpus,
    /// Fit on the training rows only
    TrainSplit,
}

impl From<FitScopeArg> for FitScope {
    fn from(arg: FitScopeArg) -> Self {
        match arg {
            FitScopeArg::Corpus => FitScope::Corpus,
            FitScopeArg::TrainSplit => FitScope::TrainSplit,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
