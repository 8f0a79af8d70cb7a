//! Result ordering and pagination.

use std::cmp::Ordering;

use scout_entity::IndexedEntity;

use crate::query::{Pagination, SortField, SortOrder, Sorting};
use crate::result::PageInfo;

/// A scored candidate, before projection into a [`crate::SearchResult`].
#[derive(Debug, Clone)]
pub struct Hit {
    /// Snapshot of the matched entity.
    pub entity: IndexedEntity,
    /// Relevance score.
    pub score: f32,
    /// Fields that contributed to the score.
    pub matched_fields: Vec<String>,
}

fn compare_by(a: &Hit, b: &Hit, field: &SortField, order: SortOrder) -> Ordering {
    let ordering = match field {
        SortField::Score => a.score.total_cmp(&b.score),
        SortField::Title => a.entity.title.cmp(&b.entity.title),
        SortField::Created => a.entity.created_at.cmp(&b.entity.created_at),
        SortField::Updated => a.entity.updated_at.cmp(&b.entity.updated_at),
        SortField::Kind => a.entity.kind.as_str().cmp(b.entity.kind.as_str()),
        SortField::Metadata(key) => {
            // Entities lacking the key sort after those carrying it
            // regardless of direction, so only the value comparison is
            // direction-sensitive.
            return match (a.entity.metadata.get(key), b.entity.metadata.get(key)) {
                (Some(va), Some(vb)) => directed(va.sort_cmp(vb), order),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
        }
    };
    directed(ordering, order)
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

/// Orders hits by the requested keys.
///
/// The sort is stable, and ties after the secondary key fall back to the
/// entity id so repeated queries over an unchanged index paginate
/// identically.
pub fn sort_hits(hits: &mut [Hit], sorting: &Sorting) {
    hits.sort_by(|a, b| {
        let mut ordering = compare_by(a, b, &sorting.field, sorting.order);
        if ordering == Ordering::Equal
            && let Some((field, order)) = &sorting.secondary
        {
            ordering = compare_by(a, b, field, *order);
        }
        if ordering == Ordering::Equal {
            ordering = a.entity.id.cmp(&b.entity.id);
        }
        ordering
    });
}

/// Computes the index range of the requested page plus its metadata.
///
/// A page past the end yields an empty range, not an error.
pub fn paginate(total: usize, pagination: &Pagination) -> (std::ops::Range<usize>, PageInfo) {
    let limit = pagination.limit;
    let total_pages = total.div_ceil(limit);
    let start = (pagination.page - 1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);

    let info = PageInfo {
        page: pagination.page,
        limit,
        total,
        total_pages,
        has_next: pagination.page < total_pages,
        has_prev: pagination.page > 1 && total > 0,
    };
    (start..end, info)
}
