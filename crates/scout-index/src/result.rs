//! Search result and response types.

use scout_entity::{EntityKind, IndexedEntity};
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::{Aggregations, Facets},
    query::SearchQuery,
};

/// Maximum length, in characters, of a content preview.
const PREVIEW_LEN: usize = 200;

/// Highlighted fragments for one field of a matched entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Field the fragments come from ("title", "description", "content").
    pub field: String,
    /// Fragments with matched spans wrapped in `<mark>`/`</mark>`.
    pub fragments: Vec<String>,
}

/// A matched entity, projected for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Engine-side entity id.
    pub id: String,
    /// Source-of-truth record id.
    pub entity_id: String,
    /// Record type.
    pub kind: EntityKind,
    /// Entity title.
    pub title: String,
    /// Relevance score.
    pub score: f32,
    /// Highlighted fragments, one entry per matched field.
    pub highlights: Vec<Highlight>,
    /// Human-readable path: kind, workspace, title.
    pub breadcrumb: String,
    /// Names of the fields that matched the query.
    pub matched_fields: Vec<String>,
    /// Truncated content preview.
    pub preview: String,
    /// Navigation reference for the host application.
    pub navigation: String,
}

impl SearchResult {
    /// Builds the projection for a scored entity.
    pub(crate) fn project(
        entity: &IndexedEntity,
        score: f32,
        highlights: Vec<Highlight>,
        matched_fields: Vec<String>,
    ) -> Self {
        Self {
            id: entity.id.clone(),
            entity_id: entity.entity_id.clone(),
            kind: entity.kind,
            title: entity.title.clone(),
            score,
            highlights,
            breadcrumb: entity.breadcrumb(),
            matched_fields,
            preview: preview(&entity.content),
            navigation: entity.navigation_ref(),
        }
    }
}

/// Truncates content to a preview on a character boundary.
fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_LEN {
        return content.to_string();
    }
    let truncated: String = content.chars().take(PREVIEW_LEN).collect();
    format!("{truncated}…")
}

/// Pagination metadata for a response page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-based page number.
    pub page: usize,
    /// Requested page size.
    pub limit: usize,
    /// Total matching results across all pages.
    pub total: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

/// A complete search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The requested page of results.
    pub results: Vec<SearchResult>,
    /// Pagination metadata.
    pub pagination: PageInfo,
    /// Counts over the full filtered candidate set, not just this page.
    pub aggregations: Aggregations,
    /// Aggregation dimensions annotated with filter-selection state.
    pub facets: Facets,
    /// Candidate query completions.
    pub suggestions: Vec<String>,
    /// Search duration in milliseconds.
    pub search_time_ms: u64,
    /// The query that produced this response, echoed for traceability.
    pub query: SearchQuery,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_content_previews_unchanged() {
        assert_eq!(preview("short body"), "short body");
    }

    #[test]
    fn long_content_is_truncated_with_ellipsis() {
        let content = "x".repeat(300);
        let result = preview(&content);
        assert_eq!(result.chars().count(), PREVIEW_LEN + 1);
        assert!(result.ends_with('…'));
    }

    #[test]
    fn projection_carries_entity_identity() {
        let mut entity = IndexedEntity::new("idx-9", EntityKind::Checkpoint, "Nightly");
        entity.entity_id = "cp-9".to_string();
        entity.content = "checkpoint body".to_string();

        let result = SearchResult::project(&entity, 12.5, vec![], vec!["title".to_string()]);
        assert_eq!(result.id, "idx-9");
        assert_eq!(result.entity_id, "cp-9");
        assert_eq!(result.navigation, "scout://checkpoint/cp-9");
        assert_eq!(result.preview, "checkpoint body");
        assert_eq!(result.score, 12.5);
    }
}
