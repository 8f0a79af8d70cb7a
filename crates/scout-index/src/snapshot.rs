//! Durable index snapshots.
//!
//! The index persists as two JSON files in the snapshot directory:
//! `terms.json` carries the forward and reverse indices with a hash of
//! the analysis settings, `entities.json` carries the full entity list.
//! Loading tolerates absence (cold start) and decode failures (warn and
//! start empty); a settings-hash mismatch also starts empty, since terms
//! derived under different settings would be unreachable.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher24;
use tracing::{debug, warn};

use scout_entity::IndexedEntity;
use scout_text::ProcessorSettings;

use crate::error::IndexError;
use crate::store::Stores;

/// Forward- and reverse-index snapshot file.
const TERMS_FILE: &str = "terms.json";

/// Entity store snapshot file.
const ENTITIES_FILE: &str = "entities.json";

/// Hash of the analysis settings a snapshot was written under.
///
/// Index terms are only meaningful under the settings that derived them;
/// reloading a stemmed index into an unstemmed engine would strand every
/// posting. Extra stop words participate because they change which terms
/// are derived; they are hashed sorted so list order does not matter.
pub fn settings_hash(settings: &ProcessorSettings, extra_stop_words: &[String]) -> u64 {
    let mut hasher = SipHasher24::new();
    hasher.write_u8(settings.remove_stop_words as u8);
    hasher.write_u8(settings.stemming as u8);
    let mut extras: Vec<&String> = extra_stop_words.iter().collect();
    extras.sort_unstable();
    for word in extras {
        hasher.write(word.as_bytes());
        hasher.write_u8(0);
    }
    hasher.finish()
}

#[derive(Serialize, Deserialize)]
struct TermsSnapshot {
    /// Hash of the analysis settings at flush time.
    settings_hash: u64,
    /// Term to entity-id postings.
    forward: HashMap<String, HashSet<String>>,
    /// Entity id to term set.
    reverse: HashMap<String, HashSet<String>>,
}

/// Reads and writes index snapshots under a fixed directory.
pub struct SnapshotStore {
    dir: PathBuf,
    settings_hash: u64,
}

impl SnapshotStore {
    pub fn new(
        dir: impl Into<PathBuf>,
        settings: &ProcessorSettings,
        extra_stop_words: &[String],
    ) -> Self {
        Self {
            dir: dir.into(),
            settings_hash: settings_hash(settings, extra_stop_words),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn terms_path(&self) -> PathBuf {
        self.dir.join(TERMS_FILE)
    }

    fn entities_path(&self) -> PathBuf {
        self.dir.join(ENTITIES_FILE)
    }

    /// Loads the persisted index, falling back to an empty one.
    ///
    /// Only I/O errors other than absence propagate; a snapshot that
    /// cannot be decoded, or that was written under different analysis
    /// settings, is reported and ignored.
    pub fn load(&self) -> Result<Stores, IndexError> {
        let terms = match self.read_file(&self.terms_path())? {
            Some(raw) => raw,
            None => {
                debug!(dir = %self.dir.display(), "no index snapshot, starting cold");
                return Ok(Stores::default());
            }
        };
        let entities = match self.read_file(&self.entities_path())? {
            Some(raw) => raw,
            None => {
                warn!(dir = %self.dir.display(), "entity snapshot missing, starting cold");
                return Ok(Stores::default());
            }
        };

        let terms: TermsSnapshot = match serde_json::from_str(&terms) {
            Ok(terms) => terms,
            Err(err) => {
                warn!(path = %self.terms_path().display(), error = %err,
                    "malformed term snapshot, starting empty");
                return Ok(Stores::default());
            }
        };
        let entities: Vec<IndexedEntity> = match serde_json::from_str(&entities) {
            Ok(entities) => entities,
            Err(err) => {
                warn!(path = %self.entities_path().display(), error = %err,
                    "malformed entity snapshot, starting empty");
                return Ok(Stores::default());
            }
        };

        if terms.settings_hash != self.settings_hash {
            warn!(
                snapshot = terms.settings_hash,
                current = self.settings_hash,
                "analysis settings changed since snapshot, starting empty"
            );
            return Ok(Stores::default());
        }

        let entities = entities
            .into_iter()
            .map(|entity| (entity.id.clone(), entity))
            .collect();
        Ok(Stores::from_parts(terms.forward, terms.reverse, entities))
    }

    /// Writes both snapshot files, creating the directory if needed.
    pub fn flush(&self, stores: &Stores) -> Result<(), IndexError> {
        fs::create_dir_all(&self.dir)?;

        let (forward, reverse, entities) = stores.parts();
        let terms = TermsSnapshot {
            settings_hash: self.settings_hash,
            forward: forward.clone(),
            reverse: reverse.clone(),
        };
        let terms_json = serde_json::to_string(&terms)
            .map_err(|err| IndexError::SnapshotEncode(err.to_string()))?;
        let entities: Vec<&IndexedEntity> = entities.values().collect();
        let entities_json = serde_json::to_string(&entities)
            .map_err(|err| IndexError::SnapshotEncode(err.to_string()))?;

        fs::write(self.terms_path(), terms_json)?;
        fs::write(self.entities_path(), entities_json)?;
        debug!(dir = %self.dir.display(), "index snapshot written");
        Ok(())
    }

    /// Deletes both snapshot files. Absence is not an error.
    pub fn remove(&self) -> Result<(), IndexError> {
        for path in [self.terms_path(), self.entities_path()] {
            if let Err(err) = fs::remove_file(&path)
                && err.kind() != std::io::ErrorKind::NotFound
            {
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, IndexError> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
