//! The unit of indexing.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EntityKind, MetaValue};

/// A record as held by the engine's entity store.
///
/// This is a copy/summary of an application record, keyed by `id` (unique
/// and immutable within the engine) and pointing back at its source of
/// truth via `entity_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEntity {
    /// Unique identifier within the engine. Immutable once assigned.
    pub id: String,
    /// Record type.
    pub kind: EntityKind,
    /// Identifier of the source-of-truth record. Not owned by the engine.
    pub entity_id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Free-text body. May be long.
    #[serde(default)]
    pub content: String,
    /// Typed metadata bag.
    #[serde(default)]
    pub metadata: BTreeMap<String, MetaValue>,
    /// Tags. Any-of matching in filters.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Categories. Any-of matching in filters.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Owning workspace, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    /// Project path the record relates to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
    /// Owning user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Application-defined status (e.g. "open", "archived").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// File size in bytes, for file records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// File type/extension, for file records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl IndexedEntity {
    /// Creates a minimal entity with the given identity and title.
    ///
    /// Timestamps default to now; everything else is empty. Convenient for
    /// collaborators that fill in fields incrementally, and for tests.
    pub fn new(id: impl Into<String>, kind: EntityKind, title: impl Into<String>) -> Self {
        let id = id.into();
        let now = Utc::now();
        Self {
            entity_id: id.clone(),
            id,
            kind,
            title: title.into(),
            description: String::new(),
            content: String::new(),
            metadata: BTreeMap::new(),
            tags: BTreeSet::new(),
            categories: BTreeSet::new(),
            workspace_id: None,
            project_path: None,
            user_id: None,
            status: None,
            created_at: now,
            updated_at: now,
            file_size: None,
            file_type: None,
        }
    }

    /// Returns all searchable text fields concatenated for tokenization.
    ///
    /// The token set of an entity is derived from title, description,
    /// content, tags, and categories, in that order. Metadata values are
    /// filterable but not searchable.
    pub fn searchable_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.description.len() + self.content.len() + 64,
        );
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.description);
        text.push(' ');
        text.push_str(&self.content);
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        for category in &self.categories {
            text.push(' ');
            text.push_str(category);
        }
        text
    }

    /// Human-readable breadcrumb for display: kind, workspace, title.
    pub fn breadcrumb(&self) -> String {
        let mut parts = vec![self.kind.to_string()];
        if let Some(ws) = &self.workspace_id {
            parts.push(ws.clone());
        }
        parts.push(self.title.clone());
        parts.join(" › ")
    }

    /// Navigation reference used by the host application to open the record.
    pub fn navigation_ref(&self) -> String {
        format!("scout://{}/{}", self.kind, self.entity_id)
    }
}
