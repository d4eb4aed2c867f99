use std::fmt;

use serde::{Deserialize, Serialize};

use super::label::{Label, LabeledMessage};

/// Fill statistics of one CSV column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub non_empty: usize,
}

/// Shape and class balance of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub n_rows: usize,
    pub columns: Vec<ColumnInfo>,
    pub ham: usize,
    pub spam: usize,
}

impl DatasetSummary {
    pub(super) fn new(columns: &[String], non_empty: &[usize], messages: &[LabeledMessage]) -> Self {
        let spam = messages.iter().filter(|m| m.label == Label::Spam).count();
        DatasetSummary {
            n_rows: messages.len(),
            columns: columns
                .iter()
                .zip(non_empty)
                .map(|(name, &non_empty)| ColumnInfo {
                    name: name.clone(),
                    non_empty,
                })
                .collect(),
            ham: messages.len() - spam,
            spam,
        }
    }

    /// Fraction of spam rows.
    pub fn spam_fraction(&self) -> f64 {
        if self.n_rows == 0 {
            0.0
        } else {
            self.spam as f64 / self.n_rows as f64
        }
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows: {}", self.n_rows)?;
        writeln!(f, "Columns ({}):", self.columns.len())?;
        let width = self.columns.iter().map(|c| c.name.len()).max().unwrap_or(0).max(6);
        for (i, column) in self.columns.iter().enumerate() {
            let name = if column.name.is_empty() {
                format!("<unnamed {}>", i)
            } else {
                column.name.clone()
            };
            writeln!(f, "  {:<width$}  {} non-empty", name, column.non_empty, width = width + 4)?;
        }
        writeln!(f, "Labels:")?;
        writeln!(f, "  ham   {}", self.ham)?;
        write!(f, "  spam  {}", self.spam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let messages = vec![
            LabeledMessage::new(Label::Ham, "a"),
            LabeledMessage::new(Label::Spam, "b"),
            LabeledMessage::new(Label::Ham, "c"),
        ];
        let columns = vec!["v1".to_string(), "v2".to_string()];
        let summary = DatasetSummary::new(&columns, &[3, 3], &messages);

        assert!((summary.spam_fraction() - 1.0 / 3.0).abs() < 1e-12);
        let text = summary.to_string();
        assert!(text.contains("Rows: 3"));
        assert!(text.contains("ham   2"));
        assert!(text.contains("spam  1"));
    }
}
