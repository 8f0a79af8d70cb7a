//! Aggregations and facets over the candidate set.
//!
//! Both are computed over the full filtered candidate set, before
//! pagination and before `min_score` trims the result list, so counts
//! always describe everything the query matched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scout_entity::IndexedEntity;

use crate::query::SearchFilters;

/// Counts of matching entities grouped by each filterable dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregations {
    /// Count per entity kind.
    pub by_kind: BTreeMap<String, usize>,
    /// Count per status value, entities without a status omitted.
    pub by_status: BTreeMap<String, usize>,
    /// Count per workspace id, entities without one omitted.
    pub by_workspace: BTreeMap<String, usize>,
    /// Count per tag; an entity contributes to every tag it carries.
    pub by_tag: BTreeMap<String, usize>,
    /// Count per category; an entity contributes to every category.
    pub by_category: BTreeMap<String, usize>,
    /// Count per `YYYY-MM` bucket of `created_at`.
    pub by_month: BTreeMap<String, usize>,
}

/// One value within a facet dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    /// The dimension value.
    pub value: String,
    /// Matching entities carrying this value.
    pub count: usize,
    /// Whether the active filters already select this value.
    pub selected: bool,
}

/// The aggregation dimensions annotated with current selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    /// Entity kinds.
    pub kinds: Vec<FacetValue>,
    /// Status values.
    pub statuses: Vec<FacetValue>,
    /// Workspace ids.
    pub workspaces: Vec<FacetValue>,
    /// Tags.
    pub tags: Vec<FacetValue>,
    /// Categories.
    pub categories: Vec<FacetValue>,
}

fn bump(map: &mut BTreeMap<String, usize>, key: impl Into<String>) {
    *map.entry(key.into()).or_insert(0) += 1;
}

/// Computes aggregation counts for the candidate set.
pub fn build_aggregations<'a, I>(candidates: I) -> Aggregations
where
    I: IntoIterator<Item = &'a IndexedEntity>,
{
    let mut agg = Aggregations::default();
    for entity in candidates {
        bump(&mut agg.by_kind, entity.kind.as_str());
        if let Some(status) = &entity.status {
            bump(&mut agg.by_status, status.clone());
        }
        if let Some(workspace_id) = &entity.workspace_id {
            bump(&mut agg.by_workspace, workspace_id.clone());
        }
        for tag in &entity.tags {
            bump(&mut agg.by_tag, tag.clone());
        }
        for category in &entity.categories {
            bump(&mut agg.by_category, category.clone());
        }
        bump(&mut agg.by_month, entity.created_at.format("%Y-%m").to_string());
    }
    agg
}

fn facet_values<F>(counts: &BTreeMap<String, usize>, selected: F) -> Vec<FacetValue>
where
    F: Fn(&str) -> bool,
{
    counts
        .iter()
        .map(|(value, count)| FacetValue {
            value: value.clone(),
            count: *count,
            selected: selected(value),
        })
        .collect()
}

/// Derives facet selection state from the aggregations and active filters.
pub fn build_facets(agg: &Aggregations, filters: &SearchFilters) -> Facets {
    Facets {
        kinds: facet_values(&agg.by_kind, |value| {
            filters.kinds.iter().any(|kind| kind.as_str() == value)
        }),
        statuses: facet_values(&agg.by_status, |value| {
            filters.statuses.iter().any(|status| status == value)
        }),
        workspaces: facet_values(&agg.by_workspace, |value| {
            filters.workspace_ids.iter().any(|id| id == value)
        }),
        tags: facet_values(&agg.by_tag, |value| {
            filters.tags.iter().any(|tag| tag == value)
        }),
        categories: facet_values(&agg.by_category, |value| {
            filters.categories.iter().any(|category| category == value)
        }),
    }
}
