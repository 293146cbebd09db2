// JSON file store for topic representations and training pairs.
//
// Layout:
//   <representations_dir>/topic_<kind>.json
//       { "<tid>": ["text", ...], ... }
//   <samples_dir>/<kind>/<pairing>/topic_<tid>.json
//       PairSetFile
//
// Topic ids are strings only inside these files. Keys are parsed into
// integers on load and formatted back on save.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::traits::{PairPersister, PairSetKey, RepresentationLoader};
use crate::pairs::kinds::{PairingKind, RepresentationKind};
use crate::pairs::sampler::{Pair, PairSet, TopicId, TopicPool};

/// On-disk form of a persisted pair set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSetFile {
    pub representation_kind: RepresentationKind,
    pub pairing_kind: PairingKind,
    pub topic_id: TopicId,
    /// Count the caller asked for (may be negative or exceed the total).
    pub requested: i64,
    pub total_candidates: usize,
    pub created_at: DateTime<Utc>,
    pub pairs: Vec<Pair>,
}

/// Directory-backed implementation of both storage traits.
#[derive(Debug, Clone)]
pub struct JsonStore {
    representations_dir: PathBuf,
    samples_dir: PathBuf,
}

impl JsonStore {
    pub fn new(representations_dir: impl Into<PathBuf>, samples_dir: impl Into<PathBuf>) -> Self {
        Self {
            representations_dir: representations_dir.into(),
            samples_dir: samples_dir.into(),
        }
    }

    pub fn representation_path(&self, kind: RepresentationKind) -> PathBuf {
        self.representations_dir.join(format!("topic_{kind}.json"))
    }

    pub fn pair_set_path(&self, key: &PairSetKey) -> PathBuf {
        self.samples_dir
            .join(key.kind.as_str())
            .join(key.pairing.as_str())
            .join(format!("topic_{}.json", key.tid))
    }

    /// Read back a pair set written by [`PairPersister::save`].
    pub fn load_pair_set(&self, key: &PairSetKey) -> Result<PairSetFile> {
        let path = self.pair_set_path(key);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read pair set {}", path.display()))?;
        let file: PairSetFile = serde_json::from_str(&json)
            .with_context(|| format!("Malformed pair set {}", path.display()))?;
        Ok(file)
    }

    /// Write a topic pool in the representation file format. Used to seed
    /// stores from other tooling and by tests.
    pub fn save_pool(&self, kind: RepresentationKind, pool: &TopicPool) -> Result<PathBuf> {
        let path = self.representation_path(kind);
        let raw: IndexMap<String, &Vec<String>> = pool
            .iter()
            .map(|(tid, reps)| (tid.to_string(), reps))
            .collect();
        write_json(&path, &raw)?;
        Ok(path)
    }
}

impl RepresentationLoader for JsonStore {
    fn load(&self, kind: RepresentationKind) -> Result<TopicPool> {
        let path = self.representation_path(kind);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read representation file {}", path.display()))?;
        let raw: IndexMap<String, Vec<String>> = serde_json::from_str(&json)
            .with_context(|| format!("Malformed representation file {}", path.display()))?;

        let pool = parse_pool(raw, &path)?;
        info!(
            kind = %kind,
            topics = pool.len(),
            path = %path.display(),
            "Loaded topic representations"
        );
        Ok(pool)
    }
}

impl PairPersister for JsonStore {
    fn save(&self, key: &PairSetKey, requested: i64, set: &PairSet) -> Result<()> {
        let path = self.pair_set_path(key);
        let file = PairSetFile {
            representation_kind: key.kind,
            pairing_kind: key.pairing,
            topic_id: key.tid,
            requested,
            total_candidates: set.total_candidates,
            created_at: Utc::now(),
            pairs: set.pairs.clone(),
        };
        write_json(&path, &file)?;
        debug!(tid = key.tid, pairs = set.len(), path = %path.display(), "Saved pair set");
        Ok(())
    }
}

/// Convert string-keyed file contents into a pool. Blank representation
/// strings are dropped so every pair side is non-empty.
fn parse_pool(raw: IndexMap<String, Vec<String>>, path: &Path) -> Result<TopicPool> {
    let mut pool = TopicPool::with_capacity(raw.len());

    for (key, reps) in raw {
        let tid: TopicId = key.trim().parse().with_context(|| {
            format!(
                "Topic key '{key}' in {} is not an unsigned integer",
                path.display()
            )
        })?;

        let before = reps.len();
        let reps: Vec<String> = reps.into_iter().filter(|r| !r.trim().is_empty()).collect();
        if reps.len() < before {
            warn!(tid, dropped = before - reps.len(), "Dropped blank representations");
        }

        if pool.insert(tid, reps).is_some() {
            anyhow::bail!("Topic {tid} appears more than once in {}", path.display());
        }
    }

    Ok(pool)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
