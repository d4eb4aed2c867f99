//! Term extraction shared by the bag-of-words vectorizers.

/// Splits a document into lowercase word terms and their n-grams.
///
/// A word is a maximal run of alphanumeric characters or underscores that is
/// at least two characters long. N-grams join consecutive words with a
/// single space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermExtractor {
    min_n: usize,
    max_n: usize,
}

impl TermExtractor {
    /// Unigrams only.
    pub fn new() -> Self {
        TermExtractor { min_n: 1, max_n: 1 }
    }

    /// Every n-gram with `min_n <= n <= max_n`.
    ///
    /// `min_n` is raised to 1 and `max_n` to `min_n` when out of order.
    pub fn with_ngram_range(min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        TermExtractor {
            min_n,
            max_n: max_n.max(min_n),
        }
    }

    /// The `(min_n, max_n)` range.
    pub fn ngram_range(&self) -> (usize, usize) {
        (self.min_n, self.max_n)
    }

    /// Lowercased words of at least two characters.
    pub fn words(&self, document: &str) -> Vec<String> {
        document
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|word| word.chars().count() >= 2)
            .map(str::to_lowercase)
            .collect()
    }

    /// All terms of the document, unigrams first, then longer n-grams.
    pub fn terms(&self, document: &str) -> Vec<String> {
        let words = self.words(document);
        if self.min_n == 1 && self.max_n == 1 {
            return words;
        }

        let mut terms = Vec::new();
        for n in self.min_n..=self.max_n {
            if n > words.len() {
                break;
            }
            terms.extend(words.windows(n).map(|window| window.join(" ")));
        }
        terms
    }
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_character_words_dropped() {
        let extractor = TermExtractor::new();
        assert_eq!(extractor.words("u r a winner"), vec!["winner"]);
        assert_eq!(extractor.words("ok go"), vec!["ok", "go"]);
    }

    #[test]
    fn test_words_split_on_punctuation() {
        let extractor = TermExtractor::new();
        assert_eq!(
            extractor.words("Don't call 0800-FREE"),
            vec!["don", "call", "0800", "free"]
        );
    }

    #[test]
    fn test_bigrams() {
        let extractor = TermExtractor::with_ngram_range(1, 2);
        assert_eq!(
            extractor.terms("win cash click"),
            vec!["win", "cash", "click", "win cash", "cash click"]
        );
    }

    #[test]
    fn test_bigrams_on_short_document() {
        let extractor = TermExtractor::with_ngram_range(1, 2);
        assert_eq!(extractor.terms("hello"), vec!["hello"]);
        assert!(extractor.terms("").is_empty());
    }

    #[test]
    fn test_range_is_normalized() {
        assert_eq!(TermExtractor::with_ngram_range(0, 0).ngram_range(), (1, 1));
        assert_eq!(TermExtractor::with_ngram_range(2, 1).ngram_range(), (2, 2));
    }
}
