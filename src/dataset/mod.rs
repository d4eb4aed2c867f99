//! Labeled SMS dataset loading.
//!
//! The input is a CSV file with a header row naming at least the `v1`
//! (label) and `v2` (message) columns. Bytes are decoded as Latin-1, so
//! every file decodes. Other columns are counted for the summary and
//! otherwise ignored.

mod label;
mod summary;

pub use label::{Label, LabeledMessage, encode_labels};
pub use summary::{ColumnInfo, DatasetSummary};

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use crate::error::{Result, SpamkitError};

/// Header of the label column.
pub const LABEL_COLUMN: &str = "v1";

/// Header of the message column.
pub const TEXT_COLUMN: &str = "v2";

/// Decode ISO-8859-1 bytes; every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// A loaded dataset: messages in file order plus per-column statistics.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    non_empty: Vec<usize>,
    messages: Vec<LabeledMessage>,
}

impl Dataset {
    /// Load a dataset from a CSV file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SpamkitError::dataset(format!("cannot open {}: {}", path.display(), e))
        })?;
        let dataset = Self::from_reader(file)?;
        log::info!(
            "Loaded {} messages from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Read a dataset from any CSV byte source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = reader.byte_headers()?.iter().map(decode_latin1).collect();
        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c.trim() == name)
                .ok_or_else(|| SpamkitError::dataset(format!("missing column '{}'", name)))
        };
        let label_index = position(LABEL_COLUMN)?;
        let text_index = position(TEXT_COLUMN)?;

        let mut non_empty = vec![0usize; columns.len()];
        let mut messages = Vec::new();
        let mut record = ByteRecord::new();

        while reader.read_byte_record(&mut record)? {
            let line = record.position().map_or(0, |p| p.line());
            for (i, field) in record.iter().enumerate().take(columns.len()) {
                if !field.is_empty() {
                    non_empty[i] += 1;
                }
            }

            let field = |index: usize, name: &str| {
                record.get(index).map(decode_latin1).ok_or_else(|| {
                    SpamkitError::dataset(format!("line {}: missing '{}' field", line, name))
                })
            };
            let label_text = field(label_index, LABEL_COLUMN)?;
            let text = field(text_index, TEXT_COLUMN)?;

            let label = label_text.trim().parse::<Label>().map_err(|_| {
                SpamkitError::dataset(format!("line {}: unknown label '{}'", line, label_text))
            })?;
            messages.push(LabeledMessage { label, text });
        }

        Ok(Dataset {
            columns,
            non_empty,
            messages,
        })
    }

    /// Build a dataset directly from messages.
    pub fn from_messages(messages: Vec<LabeledMessage>) -> Self {
        let n = messages.len();
        Dataset {
            columns: vec![LABEL_COLUMN.to_string(), TEXT_COLUMN.to_string()],
            non_empty: vec![n, messages.iter().filter(|m| !m.text.is_empty()).count()],
            messages,
        }
    }

    /// Messages in file order.
    pub fn messages(&self) -> &[LabeledMessage] {
        &self.messages
    }

    /// Message texts in file order.
    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.text.as_str()).collect()
    }

    /// Encoded labels (`spam` = 1, `ham` = 0) in file order.
    pub fn labels(&self) -> Vec<usize> {
        encode_labels(&self.messages)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the dataset has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Row count, column fill counts and label distribution.
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::new(&self.columns, &self.non_empty, &self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"v1,v2,,,\n\
ham,\"Go until jurong point, crazy..\",,,\n\
spam,Free entry in 2 a wkly comp,,,\n\
ham,U dun say so early hor,extra,,\n";

    #[test]
    fn test_load_sample() {
        let dataset = Dataset::from_reader(SAMPLE).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.messages()[0].text, "Go until jurong point, crazy..");
        assert_eq!(dataset.labels(), vec![0, 1, 0]);
    }

    #[test]
    fn test_latin1_decoding() {
        let mut bytes = b"v1,v2\nspam,Win \xa3100 now\n".to_vec();
        bytes.extend_from_slice(b"ham,caf\xe9\n");
        let dataset = Dataset::from_reader(bytes.as_slice()).unwrap();

        assert_eq!(dataset.messages()[0].text, "Win £100 now");
        assert_eq!(dataset.messages()[1].text, "café");
    }

    #[test]
    fn test_missing_column() {
        let error = Dataset::from_reader(&b"label,text\nham,hi\n"[..]).unwrap_err();
        assert!(error.to_string().contains("missing column 'v1'"));
    }

    #[test]
    fn test_unknown_label() {
        let error = Dataset::from_reader(&b"v1,v2\nmaybe,hi\n"[..]).unwrap_err();
        assert!(error.to_string().contains("unknown label 'maybe'"));
    }

    #[test]
    fn test_short_row() {
        let error = Dataset::from_reader(&b"v1,v2\nham\n"[..]).unwrap_err();
        assert!(error.to_string().contains("missing 'v2' field"));
    }

    #[test]
    fn test_column_order_is_free() {
        let dataset = Dataset::from_reader(&b"v2,v1\nhello,ham\n"[..]).unwrap();
        assert_eq!(dataset.messages()[0].label, Label::Ham);
        assert_eq!(dataset.texts(), vec!["hello"]);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Dataset::load("/nonexistent/spam.csv").is_err());
    }

    #[test]
    fn test_summary_counts() {
        let summary = Dataset::from_reader(SAMPLE).unwrap().summary();

        assert_eq!(summary.n_rows, 3);
        assert_eq!(summary.ham, 2);
        assert_eq!(summary.spam, 1);
        assert_eq!(summary.columns.len(), 5);
        assert_eq!(summary.columns[2].non_empty, 1);
    }
}
