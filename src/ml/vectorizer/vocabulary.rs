//! Term vocabulary with a frequency cap.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sorted term → column mapping.
///
/// Columns follow alphabetical term order. When a cap is given, only the
/// terms with the highest corpus-wide counts are kept, ties going to the
/// alphabetically smaller term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from per-document term lists.
    pub fn build(documents: &[Vec<String>], max_features: Option<usize>) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for terms in documents {
            for term in terms {
                *counts.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        if let Some(limit) = max_features {
            if ranked.len() > limit {
                ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                ranked.truncate(limit);
            }
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term.to_string()).collect();
        terms.sort_unstable();

        Self::from_sorted_terms(terms)
    }

    fn from_sorted_terms(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        Vocabulary { terms, index }
    }

    /// Column of `term`, if present.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Whether `term` is in the vocabulary.
    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Raw term counts of one document, one slot per column.
    pub fn count_terms(&self, terms: &[String]) -> Vec<f32> {
        let mut row = vec![0.0; self.len()];
        for term in terms {
            if let Some(column) = self.get(term) {
                row[column] += 1.0;
            }
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|t| t.split_whitespace().map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_alphabetical_columns() {
        let vocabulary = Vocabulary::build(&docs(&["win cash", "hello cash"]), None);

        assert_eq!(vocabulary.terms(), &["cash", "hello", "win"]);
        assert_eq!(vocabulary.get("hello"), Some(1));
        assert_eq!(vocabulary.get("missing"), None);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let corpus = docs(&["aa bb bb cc cc cc", "dd dd dd dd"]);
        let vocabulary = Vocabulary::build(&corpus, Some(2));

        assert_eq!(vocabulary.terms(), &["cc", "dd"]);
    }

    #[test]
    fn test_max_features_ties_are_alphabetical() {
        let corpus = docs(&["zz yy xx", "ww"]);
        let vocabulary = Vocabulary::build(&corpus, Some(2));

        assert_eq!(vocabulary.terms(), &["ww", "xx"]);
    }

    #[test]
    fn test_empty_corpus() {
        let vocabulary = Vocabulary::build(&docs(&["", ""]), Some(10));
        assert!(vocabulary.is_empty());
        assert!(vocabulary.count_terms(&[]).is_empty());
    }

    #[test]
    fn test_count_terms() {
        let vocabulary = Vocabulary::build(&docs(&["cash win"]), None);
        let row = vocabulary.count_terms(&["win".to_string(), "win".to_string(), "x".to_string()]);
        assert_eq!(row, vec![0.0, 2.0]);
    }
}
