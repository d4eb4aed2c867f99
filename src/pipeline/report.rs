use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ClassifierKind, FeatureKind, FitScope};
use crate::ml::metrics::ClassificationReport;

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub name: String,
    /// Console header, e.g. `Word2Vec with SMOTE (0.3):`.
    pub header: String,
    pub features: FeatureKind,
    pub classifier: ClassifierKind,
    pub sampling_ratio: f64,
    pub accuracy: f64,
    pub report: ClassificationReport,
    pub n_features: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Training rows after oversampling.
    pub balanced_rows: usize,
    /// Predicted class ids of the test rows, in split order.
    #[serde(skip)]
    pub predictions: Vec<usize>,
    pub elapsed_ms: u64,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "Accuracy: {}", self.accuracy)?;
        write!(f, "{}", self.report)
    }
}

/// Results of every pipeline of one experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub started_at: DateTime<Utc>,
    pub n_documents: usize,
    /// Documents left empty by cleaning.
    pub empty_documents: usize,
    pub fit_scope: FitScope,
    pub pipelines: Vec<PipelineReport>,
}

/// Width of the divider printed between pipeline reports.
pub const DIVIDER_WIDTH: usize = 50;

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pipeline) in self.pipelines.iter().enumerate() {
            write!(f, "{pipeline}")?;
            if i + 1 < self.pipelines.len() {
                write!(f, "\n\n{}\n\n", "=".repeat(DIVIDER_WIDTH))?;
            }
        }
        Ok(())
    }
}

impl ExperimentReport {
    /// Look up a pipeline result by name.
    pub fn pipeline(&self, name: &str) -> Option<&PipelineReport> {
        self.pipelines.iter().find(|p| p.name == name)
    }
}
