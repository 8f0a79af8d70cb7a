//! The tokenization pipeline.

use crate::{Stopwords, stem};

/// Settings controlling the analysis pipeline.
#[derive(Debug, Clone)]
pub struct ProcessorSettings {
    /// Whether stop words are removed.
    pub remove_stop_words: bool,
    /// Whether suffix stemming is applied.
    pub stemming: bool,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            remove_stop_words: true,
            stemming: true,
        }
    }
}

/// Normalizes and tokenizes raw text.
///
/// The processor is shared between the indexing and query paths so both
/// always agree on term derivation.
#[derive(Debug, Clone)]
pub struct ContentProcessor {
    /// Pipeline toggles.
    settings: ProcessorSettings,
    /// Stop-word filter, consulted only when `remove_stop_words` is set.
    stopwords: Stopwords,
}

impl Default for ContentProcessor {
    fn default() -> Self {
        Self::new(ProcessorSettings::default())
    }
}

impl ContentProcessor {
    /// Creates a processor with the standard English stop-word list.
    pub fn new(settings: ProcessorSettings) -> Self {
        Self {
            settings,
            stopwords: Stopwords::new(),
        }
    }

    /// Creates a processor with a caller-supplied stop-word filter, for
    /// configurations that extend the default list.
    pub fn with_stopwords(settings: ProcessorSettings, stopwords: Stopwords) -> Self {
        Self {
            settings,
            stopwords,
        }
    }

    /// Runs the full pipeline: lowercase, strip punctuation, split, drop
    /// empties and stop words, stem.
    ///
    /// Returns tokens in input order, duplicates preserved. Callers that
    /// need a set deduplicate themselves.
    pub fn process(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let cleaned: String = lowered
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| !self.settings.remove_stop_words || !self.stopwords.contains(token))
            .map(|token| {
                if self.settings.stemming {
                    stem(token)
                } else {
                    token.to_string()
                }
            })
            .collect()
    }

    /// Processes a single term, returning `None` if it is dropped by the
    /// pipeline (stop word, or punctuation only).
    pub fn process_term(&self, term: &str) -> Option<String> {
        self.process(term).into_iter().next()
    }
}
