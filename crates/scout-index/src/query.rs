//! Query, filter, pagination, and sorting types.

use std::hash::Hasher;

use chrono::{DateTime, Utc};
use scout_entity::{EntityKind, IndexedEntity};
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher24;

/// Which timestamp a date-range filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    /// Filter on `created_at`.
    Created,
    /// Filter on `updated_at`.
    Updated,
}

/// An inclusive date range over a chosen timestamp field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// Timestamp field the bounds apply to.
    pub field: DateField,
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Checks whether `entity` falls inside the range.
    pub fn contains(&self, entity: &IndexedEntity) -> bool {
        let value = match self.field {
            DateField::Created => entity.created_at,
            DateField::Updated => entity.updated_at,
        };
        if let Some(from) = self.from
            && value < from
        {
            return false;
        }
        if let Some(to) = self.to
            && value > to
        {
            return false;
        }
        true
    }
}

/// Filter predicates. All dimensions are AND-ed; within a dimension,
/// matching is any-of. An empty dimension imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Entity kinds to include.
    #[serde(default)]
    pub kinds: Vec<EntityKind>,
    /// Statuses to include.
    #[serde(default)]
    pub statuses: Vec<String>,
    /// Date range on a chosen timestamp field.
    #[serde(default)]
    pub date_range: Option<DateRange>,
    /// Tags, any-of.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Categories, any-of.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Workspace ids, any-of.
    #[serde(default)]
    pub workspace_ids: Vec<String>,
    /// Project-path substrings, any-of.
    #[serde(default)]
    pub project_paths: Vec<String>,
    /// User ids, any-of.
    #[serde(default)]
    pub user_ids: Vec<String>,
    /// Minimum relevance score. Applied after scoring; does not affect
    /// aggregations.
    #[serde(default)]
    pub min_score: Option<f32>,
}

impl SearchFilters {
    /// Evaluates every non-score predicate against an entity.
    ///
    /// An entity lacking an optional field fails a non-empty filter on
    /// that field: with no `status`, it cannot satisfy `statuses`.
    pub fn matches(&self, entity: &IndexedEntity) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&entity.kind) {
            return false;
        }
        if !self.statuses.is_empty()
            && !entity
                .status
                .as_ref()
                .map(|s| self.statuses.contains(s))
                .unwrap_or(false)
        {
            return false;
        }
        if let Some(range) = &self.date_range
            && !range.contains(entity)
        {
            return false;
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| entity.tags.contains(t)) {
            return false;
        }
        if !self.categories.is_empty()
            && !self.categories.iter().any(|c| entity.categories.contains(c))
        {
            return false;
        }
        if !self.workspace_ids.is_empty()
            && !entity
                .workspace_id
                .as_ref()
                .map(|ws| self.workspace_ids.contains(ws))
                .unwrap_or(false)
        {
            return false;
        }
        if !self.project_paths.is_empty()
            && !entity
                .project_path
                .as_ref()
                .map(|path| self.project_paths.iter().any(|p| path.contains(p.as_str())))
                .unwrap_or(false)
        {
            return false;
        }
        if !self.user_ids.is_empty()
            && !entity
                .user_id
                .as_ref()
                .map(|u| self.user_ids.contains(u))
                .unwrap_or(false)
        {
            return false;
        }
        true
    }
}

/// Page selection. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    /// Results per page.
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

/// Sortable result fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Relevance score.
    Score,
    /// Entity title, lexicographic.
    Title,
    /// Creation timestamp.
    Created,
    /// Last-update timestamp.
    Updated,
    /// Entity kind name.
    Kind,
    /// A named metadata key. Entities lacking the key sort last.
    Metadata(String),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Primary and optional secondary sort keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sorting {
    /// Primary sort field.
    pub field: SortField,
    /// Primary sort order.
    pub order: SortOrder,
    /// Optional secondary key for ties. Without one, the original
    /// relative order of tied results is preserved.
    #[serde(default)]
    pub secondary: Option<(SortField, SortOrder)>,
}

impl Default for Sorting {
    fn default() -> Self {
        Self {
            field: SortField::Score,
            order: SortOrder::Descending,
            secondary: None,
        }
    }
}

/// A full search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Raw query text.
    pub text: String,
    /// Filter predicates.
    #[serde(default)]
    pub filters: SearchFilters,
    /// Page selection.
    #[serde(default)]
    pub pagination: Pagination,
    /// Sort keys.
    #[serde(default)]
    pub sorting: Sorting,
}

impl SearchQuery {
    /// Creates a query with default filters, pagination, and sorting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: SearchFilters::default(),
            pagination: Pagination::default(),
            sorting: Sorting::default(),
        }
    }

    /// Computes the canonical cache key for this query.
    ///
    /// Filter collections are sorted before serialization so that two
    /// queries differing only in filter-value order share a key. The
    /// canonical JSON is hashed with SipHash.
    pub fn cache_key(&self) -> u64 {
        let mut canonical = self.clone();
        canonical.filters.kinds.sort();
        canonical.filters.statuses.sort();
        canonical.filters.tags.sort();
        canonical.filters.categories.sort();
        canonical.filters.workspace_ids.sort();
        canonical.filters.project_paths.sort();
        canonical.filters.user_ids.sort();

        // Struct field order is fixed, so this serialization is canonical.
        let serialized =
            serde_json::to_string(&canonical).unwrap_or_else(|_| canonical.text.clone());
        let mut hasher = SipHasher24::new();
        hasher.write(serialized.as_bytes());
        hasher.finish()
    }
}
