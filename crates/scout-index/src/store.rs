//! The forward index, reverse index, and entity store.
//!
//! All three live in one [`Stores`] struct so a single lock guards them
//! together: a reader holding the lock always observes the three maps in
//! a mutually consistent state.

use std::collections::{HashMap, HashSet};

use scout_entity::IndexedEntity;

/// The engine's index and entity state.
///
/// Invariant: every entity id referenced by the forward index has an
/// entry in both the reverse index and the entity store, and a reverse
/// index entry holds exactly the terms derived from the entity's current
/// content.
#[derive(Debug, Clone, Default)]
pub struct Stores {
    /// Term -> ids of entities containing that term.
    forward: HashMap<String, HashSet<String>>,
    /// Entity id -> terms derived from its content.
    reverse: HashMap<String, HashSet<String>>,
    /// Entity id -> full indexed record.
    entities: HashMap<String, IndexedEntity>,
}

impl Stores {
    /// Creates empty stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds stores from raw parts. Used when loading a snapshot.
    pub fn from_parts(
        forward: HashMap<String, HashSet<String>>,
        reverse: HashMap<String, HashSet<String>>,
        entities: HashMap<String, IndexedEntity>,
    ) -> Self {
        Self {
            forward,
            reverse,
            entities,
        }
    }

    /// Upserts an entity with its derived term set.
    ///
    /// Diffs `terms` against the entity's previously recorded set: stale
    /// term -> id associations are removed before new ones are added, so
    /// re-indexing never leaves dangling postings. Re-indexing an existing
    /// id preserves its original `created_at`.
    pub fn index_entity(&mut self, mut entity: IndexedEntity, terms: HashSet<String>) {
        let id = entity.id.clone();

        if let Some(existing) = self.entities.get(&id) {
            entity.created_at = existing.created_at;
        }

        let previous = self.reverse.get(&id).cloned().unwrap_or_default();

        for stale in previous.difference(&terms) {
            if let Some(postings) = self.forward.get_mut(stale) {
                postings.remove(&id);
                if postings.is_empty() {
                    self.forward.remove(stale);
                }
            }
        }

        for added in terms.difference(&previous) {
            self.forward
                .entry(added.clone())
                .or_default()
                .insert(id.clone());
        }

        self.reverse.insert(id.clone(), terms);
        self.entities.insert(id, entity);
    }

    /// Removes an entity from all three maps.
    ///
    /// Returns the removed record; `None` (and no other effect) when the
    /// id is unknown.
    pub fn remove_entity(&mut self, id: &str) -> Option<IndexedEntity> {
        let entity = self.entities.remove(id)?;

        if let Some(terms) = self.reverse.remove(id) {
            for term in terms {
                if let Some(postings) = self.forward.get_mut(&term) {
                    postings.remove(id);
                    if postings.is_empty() {
                        self.forward.remove(&term);
                    }
                }
            }
        }

        Some(entity)
    }

    /// Drops all state.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
        self.entities.clear();
    }

    /// Looks up an entity by id.
    pub fn entity(&self, id: &str) -> Option<&IndexedEntity> {
        self.entities.get(id)
    }

    /// Returns the ids posting for a term, if any.
    pub fn postings(&self, term: &str) -> Option<&HashSet<String>> {
        self.forward.get(term)
    }

    /// Returns the recorded term set for an entity, if any.
    pub fn terms_of(&self, id: &str) -> Option<&HashSet<String>> {
        self.reverse.get(id)
    }

    /// Iterates over all `(term, postings)` pairs in the forward index.
    pub fn terms(&self) -> impl Iterator<Item = (&String, &HashSet<String>)> {
        self.forward.iter()
    }

    /// Iterates over all stored entities.
    pub fn entities(&self) -> impl Iterator<Item = &IndexedEntity> {
        self.entities.values()
    }

    /// Number of stored entities.
    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    /// Number of distinct indexed terms.
    pub fn num_terms(&self) -> usize {
        self.forward.len()
    }

    /// Rough in-memory size of the index, in bytes: term text plus one id
    /// reference per posting.
    pub fn size_estimate(&self) -> u64 {
        self.forward
            .iter()
            .map(|(term, postings)| {
                term.len() as u64
                    + postings.iter().map(|id| id.len() as u64).sum::<u64>()
            })
            .sum()
    }

    /// Exposes the raw maps for snapshotting.
    pub fn parts(
        &self,
    ) -> (
        &HashMap<String, HashSet<String>>,
        &HashMap<String, HashSet<String>>,
        &HashMap<String, IndexedEntity>,
    ) {
        (&self.forward, &self.reverse, &self.entities)
    }
}
