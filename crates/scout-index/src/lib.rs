//! Embedded full-text search and indexing engine for scout.
//!
//! This crate provides the in-process search engine behind scout. It
//! handles:
//! - An inverted index (term to entity postings) with incremental,
//!   diff-based re-indexing
//! - Exact and Levenshtein fuzzy matching over indexed terms
//! - Additive relevance scoring with highlighting
//! - Aggregations and facets over the filtered candidate set
//! - A TTL and capacity bounded query cache
//! - Durable JSON snapshots with periodic background flushing
//!
//! # Example
//!
//! ```no_run
//! use scout_config::Config;
//! use scout_entity::{EntityKind, IndexedEntity};
//! use scout_index::{SearchEngine, SearchQuery};
//!
//! let mut engine = SearchEngine::open(Config::default()).unwrap();
//!
//! let mut entity = IndexedEntity::new("s-1", EntityKind::Session, "Quarterly report");
//! entity.content = "Draft of the quarterly report".to_string();
//! engine.index_entity(entity).unwrap();
//!
//! let response = engine.search(&SearchQuery::new("quarterly")).unwrap();
//! assert_eq!(response.results[0].id, "s-1");
//! engine.close().unwrap();
//! ```

#![warn(missing_docs)]

mod aggregate;
mod cache;
mod engine;
mod error;
mod events;
mod highlight;
mod matching;
mod query;
mod rank;
mod result;
mod score;
mod snapshot;
mod stats;
mod store;

pub use aggregate::{Aggregations, FacetValue, Facets};
pub use engine::SearchEngine;
pub use error::IndexError;
pub use events::EngineEvent;
pub use query::{
    DateField, DateRange, Pagination, SearchFilters, SearchQuery, SortField, SortOrder, Sorting,
};
pub use result::{Highlight, PageInfo, SearchResponse, SearchResult};
pub use stats::EngineStats;
