//! Text analysis pipeline for the scout search engine.
//!
//! Implements a four-stage pipeline:
//! 1. Lowercase the input
//! 2. Replace non-word characters with whitespace and split
//! 3. Drop stop words (optional)
//! 4. Apply suffix-stripping stemming (optional)
//!
//! The same [`ContentProcessor`] is used for indexing and for queries, so
//! both sides always derive identical terms from identical text. The
//! pipeline is deterministic: the same input yields the same token
//! sequence.

#![warn(missing_docs)]

mod process;
mod stem;
mod stopwords;

pub use process::{ContentProcessor, ProcessorSettings};
pub use stem::stem;
pub use stopwords::Stopwords;
