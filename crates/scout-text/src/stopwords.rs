//! Stop-word filtering.

use std::collections::HashSet;

use stop_words::LANGUAGE;

/// A stop-word filter over the NLTK English list.
///
/// The NLTK list covers function words only; the larger ISO list also
/// drops everyday content words ("fix", "order") that queries need.
///
/// Uses a `HashSet` for O(1) lookup. All words are stored lowercase; the
/// tokenizer lowercases before filtering, so lookups are exact.
#[derive(Debug, Clone)]
pub struct Stopwords {
    /// Lowercased stop words.
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwords {
    /// Creates a filter with the standard English stop words.
    pub fn new() -> Self {
        let words = stop_words::get(LANGUAGE::English)
            .iter()
            .map(|w| w.to_lowercase())
            .collect();
        Self { words }
    }

    /// Creates a filter with the standard list plus extra words from the
    /// `extra_stop_words` configuration setting.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filter = Self::new();
        filter
            .words
            .extend(extra.into_iter().map(|w| w.into().to_lowercase()));
        filter
    }

    /// Checks whether a (lowercased) token is a stop word.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Returns the number of configured stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no stop words are configured.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
