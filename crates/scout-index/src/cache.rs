//! Response memoization.
//!
//! Responses are cached under the canonical query hash. Entries expire
//! after a fixed TTL, the oldest half is evicted when the cache fills,
//! and any mutation touching an entity referenced by a cached result set
//! drops that entry. Correctness beats hit rate.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::result::SearchResponse;

struct CacheEntry {
    response: SearchResponse,
    /// Engine ids of the entities in the cached result set.
    entity_ids: HashSet<String>,
    inserted_at: Instant,
    /// Insertion sequence, used for age ordering during eviction.
    seq: u64,
}

/// A TTL and capacity bounded cache of full search responses.
pub struct QueryCache {
    entries: HashMap<u64, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    next_seq: u64,
}

impl QueryCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity,
            next_seq: 0,
        }
    }

    /// Looks up a cached response, dropping it if it has expired.
    pub fn get(&mut self, key: u64) -> Option<SearchResponse> {
        match self.entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                Some(entry.response.clone())
            }
            Some(_) => {
                self.entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Caches a response, evicting the oldest half first when full.
    pub fn insert(&mut self, key: u64, response: SearchResponse) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.evict_oldest_half();
        }

        let entity_ids = response
            .results
            .iter()
            .map(|result| result.id.clone())
            .collect();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            CacheEntry {
                response,
                entity_ids,
                inserted_at: Instant::now(),
                seq,
            },
        );
    }

    fn evict_oldest_half(&mut self) {
        let mut by_age: Vec<(u64, u64)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.seq, *key))
            .collect();
        by_age.sort_unstable();
        let survivors = self.entries.len() / 2;
        for (_, key) in by_age.into_iter().take(self.entries.len() - survivors) {
            self.entries.remove(&key);
        }
    }

    /// Drops every cached response whose result set references `id`.
    pub fn invalidate_entity(&mut self, id: &str) {
        self.entries
            .retain(|_, entry| !entry.entity_ids.contains(id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
