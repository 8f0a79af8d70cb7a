//! Integration tests for the search engine.
//!
//! Exercises the full pipeline: index -> match -> filter -> score ->
//! aggregate -> sort -> paginate -> cache, plus snapshot persistence.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use scout_config::Config;
use scout_entity::{EntityKind, IndexedEntity};
use scout_index::{EngineEvent, IndexError, Pagination, SearchEngine, SearchQuery};

/// Test helper holding an engine over a temporary snapshot directory.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn config(&self) -> Config {
        config_at(self.root.path())
    }

    fn engine(&self) -> SearchEngine {
        SearchEngine::open(self.config()).unwrap()
    }
}

fn config_at(dir: &Path) -> Config {
    let mut config = Config::default();
    config.persist.snapshot_dir = Some(dir.to_path_buf());
    config
}

fn entity(id: &str, kind: EntityKind, title: &str) -> IndexedEntity {
    IndexedEntity::new(id, kind, title)
}

#[test]
fn test_exact_match_returns_title_highlight() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut report = entity("r1", EntityKind::File, "Quarterly Report");
    report.content = "Numbers for the quarter".to_string();
    engine.index_entity(report).unwrap();

    let response = engine.search(&SearchQuery::new("quarterly")).unwrap();
    assert_eq!(response.results.len(), 1);
    let result = &response.results[0];
    assert_eq!(result.id, "r1");

    let title = result
        .highlights
        .iter()
        .find(|h| h.field == "title")
        .expect("title highlight");
    assert!(title.fragments[0].contains("<mark>Quarter</mark>"));
    engine.close().unwrap();
}

#[test]
fn test_reindexing_drops_stale_terms() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut first = entity("e1", EntityKind::Session, "Sprint notes");
    first.content = "alpha rollout".to_string();
    engine.index_entity(first).unwrap();

    let mut second = entity("e1", EntityKind::Session, "Sprint notes");
    second.content = "bravo rollout".to_string();
    engine.index_entity(second).unwrap();

    let stale = engine.search(&SearchQuery::new("alpha")).unwrap();
    assert!(stale.results.is_empty(), "stale term must not match");

    let fresh = engine.search(&SearchQuery::new("bravo")).unwrap();
    assert_eq!(fresh.results.len(), 1);

    let stats = engine.statistics().unwrap();
    assert_eq!(stats.entities, 1);
    engine.close().unwrap();
}

#[test]
fn test_fuzzy_match_scores_below_exact() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut exact = entity("exact", EntityKind::File, "x");
    exact.content = "planing the release".to_string();
    let mut near = entity("near", EntityKind::File, "x");
    near.content = "planning the release".to_string();
    engine.index_entity(exact).unwrap();
    engine.index_entity(near).unwrap();

    let response = engine.search(&SearchQuery::new("planing")).unwrap();
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[0].id, "exact");
    assert!(response.results[0].score > response.results[1].score);
    engine.close().unwrap();
}

#[test]
fn test_fuzzy_can_be_disabled() {
    let env = TestEnv::new();
    let mut config = env.config();
    config.search.fuzzy = false;
    let mut engine = SearchEngine::open(config).unwrap();

    let mut near = entity("near", EntityKind::File, "x");
    near.content = "planning the release".to_string();
    engine.index_entity(near).unwrap();

    let response = engine.search(&SearchQuery::new("planing")).unwrap();
    assert!(response.results.is_empty());
    engine.close().unwrap();
}

#[test]
fn test_flush_then_load_round_trips_results() {
    let env = TestEnv::new();
    let queries = ["login", "deploy", "report"];

    let mut engine = env.engine();
    for (id, title, content) in [
        ("a", "Fix login bug", "login page stack trace"),
        ("b", "Deploy pipeline", "deploy to staging then production"),
        ("c", "Quarterly report", "deploy figures and login metrics"),
    ] {
        let mut record = entity(id, EntityKind::Session, title);
        record.content = content.to_string();
        engine.index_entity(record).unwrap();
    }
    let before: Vec<_> = queries
        .iter()
        .map(|q| engine.search(&SearchQuery::new(*q)).unwrap())
        .collect();
    engine.close().unwrap();

    let mut reopened = env.engine();
    for (query, expected) in queries.iter().zip(&before) {
        let after = reopened.search(&SearchQuery::new(*query)).unwrap();
        assert_eq!(after.results, expected.results, "query {query:?} diverged");
        assert_eq!(after.aggregations, expected.aggregations);
    }
    reopened.close().unwrap();
}

#[test]
fn test_failed_flush_retains_pending_updates() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut record = entity("e1", EntityKind::File, "Orchid care notes");
    record.content = "orchid watering schedule".to_string();
    engine.index_entity(record).unwrap();
    assert_eq!(engine.statistics().unwrap().pending_updates, 1);

    // A directory squatting on the snapshot file path makes the write fail.
    let blocker = env.root.path().join("terms.json");
    fs::create_dir(&blocker).unwrap();
    assert!(matches!(engine.flush(), Err(IndexError::Io(_))));
    assert_eq!(engine.statistics().unwrap().pending_updates, 1);

    fs::remove_dir(&blocker).unwrap();
    engine.flush().unwrap();
    assert_eq!(engine.statistics().unwrap().pending_updates, 0);
    engine.close().unwrap();

    let mut reopened = env.engine();
    let response = reopened.search(&SearchQuery::new("orchid")).unwrap();
    assert_eq!(response.results.len(), 1);
    reopened.close().unwrap();
}

#[test]
fn test_configured_stop_words_are_excluded_from_the_index() {
    let env = TestEnv::new();
    let mut config = env.config();
    config.search.extra_stop_words = vec!["acme".to_string()];
    let mut engine = SearchEngine::open(config).unwrap();

    let mut record = entity("e1", EntityKind::File, "Acme rollout plan");
    record.content = "acme rollout checklist".to_string();
    engine.index_entity(record).unwrap();

    let blocked = engine.search(&SearchQuery::new("acme")).unwrap();
    assert!(blocked.results.is_empty());
    let allowed = engine.search(&SearchQuery::new("rollout")).unwrap();
    assert_eq!(allowed.results.len(), 1);
    engine.close().unwrap();
}

#[test]
fn test_pages_tile_the_sorted_result_list() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    for i in 0..25 {
        let mut record = entity(&format!("e{i:02}"), EntityKind::Log, &format!("entry {i:02}"));
        record.content = "shared workstream".to_string();
        engine.index_entity(record).unwrap();
    }

    let mut seen = Vec::new();
    let mut page = 1;
    loop {
        let mut query = SearchQuery::new("shared");
        query.pagination = Pagination { page, limit: 10 };
        let response = engine.search(&query).unwrap();
        assert_eq!(response.pagination.total, 25);
        seen.extend(response.results.iter().map(|r| r.id.clone()));
        if !response.pagination.has_next {
            break;
        }
        page += 1;
    }

    assert_eq!(seen.len(), 25, "pages must tile without omission");
    let distinct: HashSet<_> = seen.iter().collect();
    assert_eq!(distinct.len(), 25, "pages must not overlap");
    engine.close().unwrap();
}

#[test]
fn test_aggregation_totals_are_independent_of_page_size() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    for i in 0..12 {
        let kind = if i % 3 == 0 {
            EntityKind::Session
        } else {
            EntityKind::File
        };
        let mut record = entity(&format!("e{i}"), kind, "shared title");
        record.content = "shared".to_string();
        engine.index_entity(record).unwrap();
    }

    let mut query = SearchQuery::new("shared");
    query.pagination = Pagination { page: 1, limit: 3 };
    let response = engine.search(&query).unwrap();

    assert_eq!(response.results.len(), 3);
    let total: usize = response.aggregations.by_kind.values().sum();
    assert_eq!(total, 12);
    assert_eq!(response.aggregations.by_kind["session"], 4);
    assert_eq!(response.aggregations.by_kind["file"], 8);
    engine.close().unwrap();
}

#[test]
fn test_filters_and_across_dimensions_or_within() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut record = entity("e1", EntityKind::Session, "tagged record");
    record.tags.insert("a".to_string());
    record.status = Some("open".to_string());
    engine.index_entity(record).unwrap();

    let mut any_of = SearchQuery::new("tagged");
    any_of.filters.tags = vec!["a".to_string(), "b".to_string()];
    assert_eq!(engine.search(&any_of).unwrap().results.len(), 1);

    let mut anded = any_of.clone();
    anded.filters.statuses = vec!["closed".to_string()];
    assert!(engine.search(&anded).unwrap().results.is_empty());
    engine.close().unwrap();
}

#[test]
fn test_min_score_excludes_results_but_not_aggregations() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut strong = entity("strong", EntityKind::File, "login flow");
    strong.content = "login login login".to_string();
    let mut weak = entity("weak", EntityKind::File, "misc notes");
    weak.content = "login".to_string();
    engine.index_entity(strong).unwrap();
    engine.index_entity(weak).unwrap();

    let mut query = SearchQuery::new("login");
    query.filters.min_score = Some(25.0);
    let response = engine.search(&query).unwrap();

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].id, "strong");
    assert_eq!(response.aggregations.by_kind["file"], 2);
    engine.close().unwrap();
}

#[test]
fn test_removal_is_a_visible_no_op_for_unknown_ids() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut record = entity("e1", EntityKind::File, "orphan record");
    record.content = "orphan".to_string();
    engine.index_entity(record).unwrap();

    assert!(engine.remove_entity("e1").unwrap());
    assert!(!engine.remove_entity("e1").unwrap());
    assert!(!engine.remove_entity("never-indexed").unwrap());

    let response = engine.search(&SearchQuery::new("orphan")).unwrap();
    assert!(response.results.is_empty());
    engine.close().unwrap();
}

#[test]
fn test_short_query_is_a_validation_error() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let err = engine.search(&SearchQuery::new(" a ")).unwrap_err();
    assert!(matches!(err, IndexError::QueryTooShort { min: 2, len: 1 }));

    let mut query = SearchQuery::new("ok query");
    query.pagination.limit = 0;
    assert!(matches!(
        engine.search(&query).unwrap_err(),
        IndexError::InvalidPagination(_)
    ));
    engine.close().unwrap();
}

#[test]
fn test_suggestions_complete_the_partial_term() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    for (id, content) in [
        ("a", "deployment checklist"),
        ("b", "deployment window"),
        ("c", "deputy roster"),
    ] {
        let mut record = entity(id, EntityKind::File, "x");
        record.content = content.to_string();
        engine.index_entity(record).unwrap();
    }

    let suggestions = engine.suggestions("deplo", 5).unwrap();
    assert_eq!(suggestions, vec!["deployment".to_string()]);

    let wider = engine.suggestions("dep", 5).unwrap();
    assert!(wider.contains(&"deployment".to_string()));
    assert!(wider.contains(&"deputy".to_string()));
    // "deployment" has more postings, so it comes first.
    assert_eq!(wider[0], "deployment");
    engine.close().unwrap();
}

#[test]
fn test_subscribers_observe_index_mutations() {
    let env = TestEnv::new();
    let mut engine = env.engine();
    let events = engine.subscribe().unwrap();

    engine
        .index_entity(entity("e1", EntityKind::File, "watched"))
        .unwrap();
    engine.remove_entity("e1").unwrap();
    engine.clear().unwrap();

    assert_eq!(events.recv().unwrap(), EngineEvent::Indexed { id: "e1".to_string() });
    assert_eq!(events.recv().unwrap(), EngineEvent::Removed { id: "e1".to_string() });
    assert_eq!(events.recv().unwrap(), EngineEvent::Cleared);
    engine.close().unwrap();
}

#[test]
fn test_clear_drops_memory_and_disk_state() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut record = entity("e1", EntityKind::File, "ephemeral");
    record.content = "ephemeral".to_string();
    engine.index_entity(record).unwrap();
    engine.flush().unwrap();
    engine.clear().unwrap();
    engine.close().unwrap();

    let mut reopened = env.engine();
    assert_eq!(reopened.statistics().unwrap().entities, 0);
    assert!(
        reopened
            .search(&SearchQuery::new("ephemeral"))
            .unwrap()
            .results
            .is_empty()
    );
    reopened.close().unwrap();
}

#[test]
fn test_end_to_end_session_login_scenario() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut fix = entity("1", EntityKind::Session, "Fix login bug");
    fix.tags.insert("bug".to_string());
    let mut template = entity("2", EntityKind::Template, "Login template");
    template.tags.insert("ui".to_string());
    let mut logout = entity("3", EntityKind::Session, "Add logout flow");
    logout.tags.insert("bug".to_string());
    logout.tags.insert("ui".to_string());
    for record in [fix, template, logout] {
        engine.index_entity(record).unwrap();
    }

    let mut query = SearchQuery::new("login");
    query.filters.kinds = vec![EntityKind::Session];
    let response = engine.search(&query).unwrap();

    assert_eq!(response.results.len(), 1);
    let result = &response.results[0];
    assert_eq!(result.id, "1");
    let title = result
        .highlights
        .iter()
        .find(|h| h.field == "title")
        .expect("title highlight");
    assert!(title.fragments[0].contains("<mark>login</mark>"));

    // Facets cover the filtered candidate set, so only sessions appear.
    let session = response
        .facets
        .kinds
        .iter()
        .find(|f| f.value == "session")
        .expect("session facet");
    assert!(session.selected);
    engine.close().unwrap();
}

#[test]
fn test_cached_response_is_invalidated_by_mutation() {
    let env = TestEnv::new();
    let mut engine = env.engine();

    let mut record = entity("e1", EntityKind::File, "cached record");
    record.content = "cached".to_string();
    engine.index_entity(record).unwrap();

    let first = engine.search(&SearchQuery::new("cached")).unwrap();
    assert_eq!(first.results.len(), 1);
    assert_eq!(engine.statistics().unwrap().cached_responses, 1);

    engine.remove_entity("e1").unwrap();
    let second = engine.search(&SearchQuery::new("cached")).unwrap();
    assert!(second.results.is_empty(), "stale cache entry served");
    engine.close().unwrap();
}
