//! The engine facade.
//!
//! `SearchEngine` owns the index and entity stores behind a single
//! read-write lock: mutations take the write lock, searches share the
//! read lock. A background thread flushes dirty state to the snapshot
//! directory on a fixed interval; `close` (or `Drop`) stops it and
//! performs a final flush.

use std::collections::HashSet;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use scout_config::Config;
use scout_entity::IndexedEntity;
use scout_text::{ContentProcessor, ProcessorSettings, Stopwords};

use crate::aggregate::{build_aggregations, build_facets};
use crate::cache::QueryCache;
use crate::error::IndexError;
use crate::events::{EngineEvent, EventBus};
use crate::highlight::build_highlights;
use crate::matching::find_matches;
use crate::query::SearchQuery;
use crate::rank::{Hit, paginate, sort_hits};
use crate::result::{SearchResponse, SearchResult};
use crate::score::score_entity;
use crate::snapshot::SnapshotStore;
use crate::stats::{EngineStats, build_stats};
use crate::store::Stores;

/// Suggestions attached to a search response.
const RESPONSE_SUGGESTIONS: usize = 5;

/// Shared engine state. Lock order is stores, then dirty; never the
/// reverse.
struct Inner {
    config: Config,
    processor: ContentProcessor,
    stores: RwLock<Stores>,
    /// Entity ids mutated since the last successful flush.
    dirty: Mutex<HashSet<String>>,
    cache: Mutex<QueryCache>,
    events: Mutex<EventBus>,
    snapshots: SnapshotStore,
}

impl Inner {
    fn read_stores(&self) -> Result<RwLockReadGuard<'_, Stores>, IndexError> {
        self.stores.read().map_err(|_| IndexError::LockPoisoned)
    }

    fn write_stores(&self) -> Result<RwLockWriteGuard<'_, Stores>, IndexError> {
        self.stores.write().map_err(|_| IndexError::LockPoisoned)
    }

    fn lock_dirty(&self) -> Result<MutexGuard<'_, HashSet<String>>, IndexError> {
        self.dirty.lock().map_err(|_| IndexError::LockPoisoned)
    }

    fn lock_cache(&self) -> Result<MutexGuard<'_, QueryCache>, IndexError> {
        self.cache.lock().map_err(|_| IndexError::LockPoisoned)
    }

    fn lock_events(&self) -> Result<MutexGuard<'_, EventBus>, IndexError> {
        self.events.lock().map_err(|_| IndexError::LockPoisoned)
    }

    /// Persists the current index if anything is dirty.
    ///
    /// Holding the read lock for the duration keeps mutations serialized
    /// against the in-flight flush. On failure the dirty set is left
    /// intact so the next cycle retries.
    fn flush(&self) -> Result<(), IndexError> {
        let stores = self.read_stores()?;
        let mut dirty = self.lock_dirty()?;
        if dirty.is_empty() {
            return Ok(());
        }
        self.snapshots.flush(&stores)?;
        debug!(flushed = dirty.len(), "persisted pending index updates");
        dirty.clear();
        Ok(())
    }
}

/// The embedded search engine.
pub struct SearchEngine {
    inner: Arc<Inner>,
    shutdown: Option<mpsc::Sender<()>>,
    flusher: Option<thread::JoinHandle<()>>,
}

impl SearchEngine {
    /// Opens the engine: loads any persisted snapshot and starts the
    /// background flush thread.
    pub fn open(config: Config) -> Result<Self, IndexError> {
        let dir = config.snapshot_dir()?;
        let settings = ProcessorSettings {
            remove_stop_words: config.search.stop_words,
            stemming: config.search.stemming,
        };
        let snapshots = SnapshotStore::new(&dir, &settings, &config.search.extra_stop_words);
        let stores = snapshots.load()?;
        info!(
            entities = stores.num_entities(),
            terms = stores.num_terms(),
            dir = %dir.display(),
            "search engine opened"
        );

        let cache = QueryCache::new(
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.capacity,
        );
        let interval = Duration::from_secs(config.persist.flush_interval_secs.max(1));
        let stopwords = Stopwords::with_extra(config.search.extra_stop_words.iter().cloned());
        let inner = Arc::new(Inner {
            processor: ContentProcessor::with_stopwords(settings, stopwords),
            config,
            stores: RwLock::new(stores),
            dirty: Mutex::new(HashSet::new()),
            cache: Mutex::new(cache),
            events: Mutex::new(EventBus::default()),
            snapshots,
        });

        let (shutdown, stop) = mpsc::channel();
        let flush_target = Arc::clone(&inner);
        let flusher = thread::spawn(move || {
            loop {
                match stop.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(err) = flush_target.flush() {
                            error!(error = %err, "periodic flush failed, will retry");
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Ok(Self {
            inner,
            shutdown: Some(shutdown),
            flusher: Some(flusher),
        })
    }

    /// Indexes an entity, replacing any prior version under the same id.
    pub fn index_entity(&self, entity: IndexedEntity) -> Result<(), IndexError> {
        let terms: HashSet<String> = self
            .inner
            .processor
            .process(&entity.searchable_text())
            .into_iter()
            .collect();
        let id = entity.id.clone();

        {
            let mut stores = self.inner.write_stores()?;
            stores.index_entity(entity, terms);
            self.inner.lock_dirty()?.insert(id.clone());
        }
        self.inner.lock_cache()?.invalidate_entity(&id);
        self.inner.lock_events()?.emit(EngineEvent::Indexed { id });
        Ok(())
    }

    /// Removes an entity. Unknown ids are a no-op; returns whether the
    /// entity existed.
    pub fn remove_entity(&self, id: &str) -> Result<bool, IndexError> {
        let removed = {
            let mut stores = self.inner.write_stores()?;
            let removed = stores.remove_entity(id).is_some();
            if removed {
                self.inner.lock_dirty()?.insert(id.to_string());
            }
            removed
        };
        if removed {
            self.inner.lock_cache()?.invalidate_entity(id);
            self.inner
                .lock_events()?
                .emit(EngineEvent::Removed { id: id.to_string() });
        }
        Ok(removed)
    }

    /// Runs a search over the current index snapshot.
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResponse, IndexError> {
        let started = Instant::now();

        let trimmed = query.text.trim();
        let min = self.inner.config.search.min_query_length;
        let len = trimmed.chars().count();
        if len < min {
            return Err(IndexError::QueryTooShort { min, len });
        }
        if query.pagination.page == 0 {
            return Err(IndexError::InvalidPagination(
                "page numbers start at 1".to_string(),
            ));
        }
        if query.pagination.limit == 0 {
            return Err(IndexError::InvalidPagination(
                "limit must be at least 1".to_string(),
            ));
        }

        let key = query.cache_key();
        if let Some(cached) = self.inner.lock_cache()?.get(key) {
            debug!(key, "query cache hit");
            return Ok(cached);
        }

        let stores = self.inner.read_stores()?;
        let tokens = self.inner.processor.process(trimmed);
        let matches = find_matches(&stores, &tokens, self.inner.config.search.fuzzy);

        // Lexicographic candidate order makes everything downstream of
        // the stable sort reproducible across runs.
        let mut candidate_ids: Vec<&String> = matches.weights.keys().collect();
        candidate_ids.sort_unstable();
        let candidates: Vec<&IndexedEntity> = candidate_ids
            .into_iter()
            .filter_map(|id| stores.entity(id))
            .filter(|entity| query.filters.matches(entity))
            .collect();

        let aggregations = build_aggregations(candidates.iter().copied());
        let facets = build_facets(&aggregations, &query.filters);

        let now = Utc::now();
        let mut hits: Vec<Hit> = Vec::with_capacity(candidates.len());
        for entity in candidates {
            let scored = score_entity(entity, &matches.expansions, trimmed, &self.inner.processor, now);
            if let Some(min_score) = query.filters.min_score
                && scored.score < min_score
            {
                continue;
            }
            hits.push(Hit {
                entity: entity.clone(),
                score: scored.score,
                matched_fields: scored.matched_fields,
            });
        }

        sort_hits(&mut hits, &query.sorting);
        hits.truncate(self.inner.config.search.max_results);

        let (range, pagination) = paginate(hits.len(), &query.pagination);
        let radius = self.inner.config.search.highlight_radius;
        let results: Vec<SearchResult> = hits[range]
            .iter()
            .map(|hit| {
                let highlights = build_highlights(&hit.entity, &matches.expansions, radius);
                SearchResult::project(&hit.entity, hit.score, highlights, hit.matched_fields.clone())
            })
            .collect();

        let suggestions = match tokens.last() {
            Some(token) => complete_term(&stores, token, RESPONSE_SUGGESTIONS),
            None => Vec::new(),
        };
        drop(stores);

        let response = SearchResponse {
            results,
            pagination,
            aggregations,
            facets,
            suggestions,
            search_time_ms: started.elapsed().as_millis() as u64,
            query: query.clone(),
        };
        self.inner.lock_cache()?.insert(key, response.clone());
        Ok(response)
    }

    /// Completes a partial query against the indexed terms.
    ///
    /// Completion applies to the last token of the partial text; earlier
    /// tokens only set it apart from a full search.
    pub fn suggestions(&self, partial: &str, limit: usize) -> Result<Vec<String>, IndexError> {
        let tokens = self.inner.processor.process(partial);
        let Some(token) = tokens.last() else {
            return Ok(Vec::new());
        };
        let stores = self.inner.read_stores()?;
        Ok(complete_term(&stores, token, limit))
    }

    /// Summarizes the current engine state.
    pub fn statistics(&self) -> Result<EngineStats, IndexError> {
        let stores = self.inner.read_stores()?;
        let cached = self.inner.lock_cache()?.len();
        let pending = self.inner.lock_dirty()?.len();
        Ok(build_stats(&stores, cached, pending))
    }

    /// Drops all in-memory and on-disk index state.
    pub fn clear(&self) -> Result<(), IndexError> {
        {
            let mut stores = self.inner.write_stores()?;
            stores.clear();
            self.inner.lock_dirty()?.clear();
        }
        self.inner.lock_cache()?.clear();
        self.inner.snapshots.remove()?;
        self.inner.lock_events()?.emit(EngineEvent::Cleared);
        info!("index cleared");
        Ok(())
    }

    /// Persists pending mutations immediately.
    pub fn flush(&self) -> Result<(), IndexError> {
        self.inner.flush()
    }

    /// Subscribes to index change events.
    pub fn subscribe(&self) -> Result<mpsc::Receiver<EngineEvent>, IndexError> {
        Ok(self.inner.lock_events()?.subscribe())
    }

    /// Stops the flush thread and performs a final flush.
    pub fn close(&mut self) -> Result<(), IndexError> {
        if let Some(shutdown) = self.shutdown.take() {
            drop(shutdown);
        }
        if let Some(flusher) = self.flusher.take()
            && flusher.join().is_err()
        {
            warn!("flush thread panicked during shutdown");
        }
        self.inner.flush()
    }
}

impl Drop for SearchEngine {
    fn drop(&mut self) {
        if self.shutdown.is_some()
            && let Err(err) = self.close()
        {
            error!(error = %err, "final flush on drop failed");
        }
    }
}

/// Indexed terms starting with `prefix`, ordered by posting count
/// descending, then alphabetically.
fn complete_term(stores: &Stores, prefix: &str, limit: usize) -> Vec<String> {
    let mut completions: Vec<(String, usize)> = stores
        .terms()
        .filter(|(term, _)| term.starts_with(prefix))
        .map(|(term, postings)| (term.clone(), postings.len()))
        .collect();
    completions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    completions.truncate(limit);
    completions.into_iter().map(|(term, _)| term).collect()
}
