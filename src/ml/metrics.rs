//! Classification metrics and the per-class report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ml::MLError;

/// Heading of the longest summary row; sets the minimum name column width.
const WEIGHTED_AVG: &str = "weighted avg";

fn check_lengths(y_true: &[usize], y_pred: &[usize]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(MLError::LengthMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        }
        .into());
    }
    Ok(())
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Fraction of predictions equal to the true label.
///
/// An empty input has accuracy 0.
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(safe_div(correct as f64, y_true.len() as f64))
}

/// Precision, recall, F1 and support of one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Averaged precision, recall and F1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Per-class metrics plus accuracy, macro and weighted averages.
///
/// Class `i` is named `class_names[i]`. A zero denominator yields 0.
///
/// # Examples
///
/// ```
/// use spamkit::ml::metrics::ClassificationReport;
///
/// let report = ClassificationReport::new(&[0, 0, 1, 1], &[0, 1, 1, 1], &["ham", "spam"]).unwrap();
/// assert_eq!(report.accuracy, 0.75);
/// assert_eq!(report.classes[1].recall, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    /// Decimal places used by the text layout.
    #[serde(skip, default = "default_digits")]
    pub digits: usize,
}

fn default_digits() -> usize {
    2
}

impl ClassificationReport {
    /// Compute the report for labels `0..class_names.len()`.
    pub fn new(y_true: &[usize], y_pred: &[usize], class_names: &[&str]) -> Result<Self> {
        check_lengths(y_true, y_pred)?;
        let n_classes = class_names.len();
        if let Some(&label) = y_true.iter().chain(y_pred).find(|&&l| l >= n_classes) {
            return Err(MLError::invalid_features(format!(
                "label {} has no class name ({} names given)",
                label, n_classes
            ))
            .into());
        }

        let mut true_positive = vec![0usize; n_classes];
        let mut predicted = vec![0usize; n_classes];
        let mut support = vec![0usize; n_classes];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            support[t] += 1;
            predicted[p] += 1;
            if t == p {
                true_positive[t] += 1;
            }
        }

        let classes: Vec<ClassMetrics> = class_names
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let precision = safe_div(true_positive[c] as f64, predicted[c] as f64);
                let recall = safe_div(true_positive[c] as f64, support[c] as f64);
                ClassMetrics {
                    name: name.to_string(),
                    precision,
                    recall,
                    f1_score: safe_div(2.0 * precision * recall, precision + recall),
                    support: support[c],
                }
            })
            .collect();

        let total = y_true.len();
        let mean = |f: fn(&ClassMetrics) -> f64| {
            safe_div(classes.iter().map(f).sum::<f64>(), n_classes as f64)
        };
        let weighted = |f: fn(&ClassMetrics) -> f64| {
            safe_div(
                classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>(),
                total as f64,
            )
        };

        let macro_avg = AverageMetrics {
            precision: mean(|c| c.precision),
            recall: mean(|c| c.recall),
            f1_score: mean(|c| c.f1_score),
            support: total,
        };
        let weighted_avg = AverageMetrics {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1_score: weighted(|c| c.f1_score),
            support: total,
        };

        Ok(ClassificationReport {
            accuracy: accuracy(y_true, y_pred)?,
            classes,
            macro_avg,
            weighted_avg,
            digits: default_digits(),
        })
    }

    /// Use `digits` decimal places in the text layout.
    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.digits;
        let width = self
            .classes
            .iter()
            .map(|c| c.name.len())
            .chain([WEIGHTED_AVG.len(), digits])
            .max()
            .unwrap_or(WEIGHTED_AVG.len());

        write!(f, "{:>width$} ", "")?;
        for header in ["precision", "recall", "f1-score", "support"] {
            write!(f, " {:>9}", header)?;
        }
        writeln!(f)?;
        writeln!(f)?;

        let row = |f: &mut fmt::Formatter<'_>,
                   name: &str,
                   precision: f64,
                   recall: f64,
                   f1: f64,
                   support: usize| {
            writeln!(
                f,
                "{:>width$}  {:>9.digits$} {:>9.digits$} {:>9.digits$} {:>9}",
                name, precision, recall, f1, support
            )
        };

        for class in &self.classes {
            row(f, &class.name, class.precision, class.recall, class.f1_score, class.support)?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.digits$} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), (WEIGHTED_AVG, &self.weighted_avg)] {
            row(f, name, avg.precision, avg.recall, avg.f1_score, avg.support)?;
        }
        Ok(())
    }
}
