//! Candidate resolution: exact and fuzzy term matching.

use std::collections::HashMap;

use crate::store::Stores;

/// Weight contributed by an exact term match.
pub const EXACT_WEIGHT: f32 = 1.0;

/// Weight contributed by a fuzzy term match.
pub const FUZZY_WEIGHT: f32 = 0.5;

/// The index terms one query token resolved to.
#[derive(Debug, Clone)]
pub struct TokenExpansion {
    /// The processed query token.
    pub token: String,
    /// Matched index terms with their weights. An exact match keeps only
    /// the exact weight even when the term is also within fuzzy distance.
    pub terms: Vec<(String, f32)>,
}

/// The outcome of resolving a whole query against the forward index.
#[derive(Debug, Default)]
pub struct MatchSet {
    /// Entity id -> accumulated match weight across all query tokens.
    pub weights: HashMap<String, f32>,
    /// Per-token term expansions, used by scoring and highlighting.
    pub expansions: Vec<TokenExpansion>,
}

impl MatchSet {
    /// True when no query token matched any indexed term.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Maximum edit distance for a fuzzy match on a token of `len` characters.
pub fn fuzzy_threshold(len: usize) -> usize {
    (len / 4).max(1)
}

/// Resolves query tokens to candidate entities.
///
/// Each token gathers exact postings at weight 1.0 and, when `fuzzy` is
/// set, postings of every indexed term within the Levenshtein threshold
/// at weight 0.5. Per-entity weights accumulate across tokens, so an
/// entity matching more of the query ranks above one matching less.
pub fn find_matches(stores: &Stores, query_tokens: &[String], fuzzy: bool) -> MatchSet {
    let mut matches = MatchSet::default();

    for token in query_tokens {
        let mut terms: Vec<(String, f32)> = Vec::new();

        if stores.postings(token).is_some() {
            terms.push((token.clone(), EXACT_WEIGHT));
        }

        if fuzzy {
            let threshold = fuzzy_threshold(token.chars().count());
            for (term, _) in stores.terms() {
                if term == token {
                    continue;
                }
                if levenshtein_within(token, term, threshold) {
                    terms.push((term.clone(), FUZZY_WEIGHT));
                }
            }
        }

        for (term, weight) in &terms {
            if let Some(postings) = stores.postings(term) {
                for id in postings {
                    *matches.weights.entry(id.clone()).or_default() += weight;
                }
            }
        }

        matches.expansions.push(TokenExpansion {
            token: token.clone(),
            terms,
        });
    }

    matches
}

/// Checks whether the edit distance between `a` and `b` is at most `max`.
///
/// Short-circuits on the length difference before running the DP.
fn levenshtein_within(a: &str, b: &str, max: usize) -> bool {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a.abs_diff(len_b) > max {
        return false;
    }
    levenshtein(a, b) <= max
}

/// Levenshtein edit distance with unit costs for insert, delete, and
/// substitute. Two-row DP over characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (prev[j + 1] + 1)
                .min(current[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b_chars.len()]
}
