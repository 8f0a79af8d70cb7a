//! Engine statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::Stores;

/// How many of the highest-posting terms statistics report.
const TOP_TERMS: usize = 10;

/// A point-in-time summary of engine state.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    /// Number of indexed entities.
    pub entities: usize,
    /// Number of distinct index terms.
    pub terms: usize,
    /// Rough in-memory index size in bytes.
    pub index_size_bytes: u64,
    /// Entity counts per kind.
    pub by_kind: BTreeMap<String, usize>,
    /// Terms with the most postings, most first.
    pub top_terms: Vec<(String, usize)>,
    /// Cached responses currently held.
    pub cached_responses: usize,
    /// Mutations awaiting the next flush.
    pub pending_updates: usize,
}

pub fn build_stats(stores: &Stores, cached_responses: usize, pending_updates: usize) -> EngineStats {
    let mut by_kind = BTreeMap::new();
    for entity in stores.entities() {
        *by_kind.entry(entity.kind.as_str().to_string()).or_insert(0) += 1;
    }

    let mut top_terms: Vec<(String, usize)> = stores
        .terms()
        .map(|(term, postings)| (term.clone(), postings.len()))
        .collect();
    // Posting count descending, term ascending on ties.
    top_terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_terms.truncate(TOP_TERMS);

    EngineStats {
        entities: stores.num_entities(),
        terms: stores.num_terms(),
        index_size_bytes: stores.size_estimate(),
        by_kind,
        top_terms,
        cached_responses,
        pending_updates,
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use scout_entity::{EntityKind, IndexedEntity};

    use super::*;

    fn terms(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn stats_summarize_the_index() {
        let mut stores = Stores::default();
        stores.index_entity(
            IndexedEntity::new("a", EntityKind::Session, "a"),
            terms(&["login", "bug"]),
        );
        stores.index_entity(
            IndexedEntity::new("b", EntityKind::File, "b"),
            terms(&["login"]),
        );

        let stats = build_stats(&stores, 3, 2);
        assert_eq!(stats.entities, 2);
        assert_eq!(stats.terms, 2);
        assert_eq!(stats.by_kind["session"], 1);
        assert_eq!(stats.by_kind["file"], 1);
        assert_eq!(stats.top_terms[0], ("login".to_string(), 2));
        assert_eq!(stats.cached_responses, 3);
        assert_eq!(stats.pending_updates, 2);
        assert!(stats.index_size_bytes > 0);
    }

    #[test]
    fn top_terms_are_capped() {
        let mut stores = Stores::default();
        for i in 0..20 {
            stores.index_entity(
                IndexedEntity::new(format!("e{i}"), EntityKind::Log, "x"),
                HashSet::from([format!("term{i}")]),
            );
        }
        let stats = build_stats(&stores, 0, 0);
        assert_eq!(stats.top_terms.len(), TOP_TERMS);
    }
}
