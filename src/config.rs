use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pairs::kinds::RepresentationKind;
use crate::pairs::sampler::TopicId;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// variable is optional.
pub struct Config {
    /// Directory holding `topic_<kind>.json` representation files.
    pub representations_dir: PathBuf,
    /// Directory that pair sets are written under.
    pub samples_dir: PathBuf,
    /// Seed for the pair sampler. Unset means a fresh OS-seeded generator.
    pub seed: Option<u64>,
    /// Orchestration settings (kinds, per-kind counts, topic ids).
    pub experiment: ExperimentConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let representations_dir = env::var("STEERPAIRS_REPRESENTATIONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir().join("topic_representations"));

        let samples_dir = env::var("STEERPAIRS_SAMPLES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir().join("training_samples"));

        let seed = parse_seed(env::var("STEERPAIRS_SEED").ok().as_deref())?;

        let experiment = match env::var("STEERPAIRS_EXPERIMENT_CONFIG") {
            Ok(path) => ExperimentConfig::from_file(Path::new(&path))?,
            Err(_) => ExperimentConfig::default(),
        };
        experiment.validate()?;

        Ok(Self {
            representations_dir,
            samples_dir,
            seed,
            experiment,
        })
    }
}

/// Parse the optional STEERPAIRS_SEED value. Unset means no seed; anything
/// set must be an unsigned integer.
pub fn parse_seed(raw: Option<&str>) -> Result<Option<u64>> {
    raw.map(|raw| {
        raw.trim()
            .parse::<u64>()
            .with_context(|| format!("STEERPAIRS_SEED must be an unsigned integer, got '{raw}'"))
    })
    .transpose()
}

/// Returns the default base directory for data files.
/// Uses the platform data directory: ~/.local/share/steerpairs/ on Linux.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("steerpairs")
}

/// What the batch run iterates over: representation kinds, how many pairs
/// to build for each, and which topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub representation_kinds: Vec<RepresentationKind>,
    /// Per-kind pair counts. Kinds missing here use [`default_num_samples`].
    pub num_samples: BTreeMap<RepresentationKind, i64>,
    /// Topics to build pairs for. Empty means every topic in the pool.
    pub topic_ids: Vec<TopicId>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            representation_kinds: RepresentationKind::ALL.to_vec(),
            num_samples: BTreeMap::new(),
            topic_ids: Vec::new(),
        }
    }
}

/// Built-in pair count for each representation kind.
pub fn default_num_samples(kind: RepresentationKind) -> i64 {
    match kind {
        RepresentationKind::Words | RepresentationKind::Phrases => 500,
        RepresentationKind::Descriptions | RepresentationKind::Summaries => 100,
    }
}

impl ExperimentConfig {
    /// Read an experiment config from a JSON file. Fields left out keep
    /// their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read experiment config {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed experiment config {}", path.display()))
    }

    /// Pair count to request for `kind`.
    pub fn num_samples_for(&self, kind: RepresentationKind) -> i64 {
        self.num_samples
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_num_samples(kind))
    }

    /// Reject configs that would make the batch run ambiguous.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for kind in &self.representation_kinds {
            if !seen.insert(*kind) {
                anyhow::bail!("Representation kind '{kind}' is listed more than once");
            }
        }

        let mut seen = HashSet::new();
        for tid in &self.topic_ids {
            if !seen.insert(*tid) {
                anyhow::bail!("Topic ID {tid} is listed more than once");
            }
        }

        Ok(())
    }
}
