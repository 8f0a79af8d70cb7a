//! Record types indexed by the scout search engine.
//!
//! The engine indexes copies/summaries of application records (sessions,
//! workspaces, templates, files, ...), not the source-of-truth entities
//! themselves. [`IndexedEntity`] is the unit of indexing; [`EntityKind`]
//! is the closed set of record types; [`MetaValue`] constrains metadata
//! to a small set of typed variants so filtering and sorting stay
//! type-safe.

#![warn(missing_docs)]

mod entity;
mod kind;
mod value;

pub use entity::IndexedEntity;
pub use kind::{EntityKind, ParseKindError};
pub use value::MetaValue;
