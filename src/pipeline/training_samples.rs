// Training-sample pipeline: load a topic pool, build pairs, persist them.
//
// Two entry points. `create_topic_training_samples` handles one topic and
// one representation kind. `create_all_training_samples` walks every kind
// and topic in the experiment config, loading each pool once.
//
// Loader and persister failures always abort. Sampler data errors (empty
// positive topic, no negatives, unknown topic) abort too unless the caller
// asks to skip the affected topic.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use tracing::{info, warn};

use crate::config::ExperimentConfig;
use crate::pairs::error::PairError;
use crate::pairs::kinds::{PairingKind, RepresentationKind};
use crate::pairs::sampler::{self, PairSet, TopicId, TopicPool};
use crate::storage::traits::{PairPersister, PairSetKey, RepresentationLoader};

/// What a batch run does when one topic cannot produce pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the whole run at the first failure.
    #[default]
    Abort,
    /// Log the failure, record the topic as skipped, move on.
    SkipTopic,
}

/// Outcome of a batch run for one representation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: RepresentationKind,
    /// Number of pair sets written.
    pub written: usize,
    /// Total pairs across all written sets.
    pub pairs: usize,
    /// Topics skipped under `FailurePolicy::SkipTopic`, with the reason.
    pub skipped: Vec<(TopicId, String)>,
}

/// Outcome of a full batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub kinds: Vec<KindSummary>,
}

impl BatchSummary {
    pub fn total_written(&self) -> usize {
        self.kinds.iter().map(|k| k.written).sum()
    }

    pub fn total_pairs(&self) -> usize {
        self.kinds.iter().map(|k| k.pairs).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.kinds.iter().map(|k| k.skipped.len()).sum()
    }
}

/// Dispatch to the sampler routine for `pairing`.
pub fn build_for_pairing<R: Rng>(
    pool: &TopicPool,
    pairing: PairingKind,
    tid: TopicId,
    target: i64,
    rng: &mut R,
) -> Result<PairSet, PairError> {
    match pairing {
        PairingKind::AgainstRandomTopicRepresentation => {
            sampler::build_pairs(pool, tid, target, rng)
        }
        PairingKind::AgainstRandomString => {
            sampler::build_random_string_pairs(pool, tid, target, rng)
        }
    }
}

/// Build and persist up to `target` pairs for one topic.
///
/// Returns the persisted pair set. Sampler errors are wrapped in the
/// returned `anyhow::Error` and can be recovered with
/// `err.downcast_ref::<PairError>()`.
pub fn create_topic_training_samples<L, P, R>(
    loader: &L,
    persister: &P,
    kind: RepresentationKind,
    pairing: PairingKind,
    tid: TopicId,
    target: i64,
    rng: &mut R,
) -> Result<PairSet>
where
    L: RepresentationLoader + ?Sized,
    P: PairPersister + ?Sized,
    R: Rng,
{
    let pool = loader
        .load(kind)
        .with_context(|| format!("Failed to load {kind} representations"))?;

    let set = build_for_pairing(&pool, pairing, tid, target, rng)?;

    let key = PairSetKey { kind, pairing, tid };
    persister
        .save(&key, target, &set)
        .with_context(|| format!("Failed to save {kind} pairs for topic {tid}"))?;

    info!(
        tid,
        kind = %kind,
        pairing = %pairing,
        requested = target,
        total = set.total_candidates,
        pairs = set.len(),
        "Created training samples"
    );

    Ok(set)
}

/// Build and persist pairs for every representation kind and topic in
/// `experiment`, using each kind's configured pair count.
pub fn create_all_training_samples<L, P, R>(
    experiment: &ExperimentConfig,
    loader: &L,
    persister: &P,
    pairing: PairingKind,
    policy: FailurePolicy,
    rng: &mut R,
) -> Result<BatchSummary>
where
    L: RepresentationLoader + ?Sized,
    P: PairPersister + ?Sized,
    R: Rng,
{
    let mut summary = BatchSummary::default();

    for &kind in &experiment.representation_kinds {
        let target = experiment.num_samples_for(kind);
        let pool = loader
            .load(kind)
            .with_context(|| format!("Failed to load {kind} representations"))?;

        let tids: Vec<TopicId> = if experiment.topic_ids.is_empty() {
            pool.keys().copied().collect()
        } else {
            experiment.topic_ids.clone()
        };

        info!(kind = %kind, topics = tids.len(), requested = target, "Building pair sets");

        let pb = ProgressBar::new(tids.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!("  {kind:<12} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut kind_summary = KindSummary {
            kind,
            written: 0,
            pairs: 0,
            skipped: Vec::new(),
        };

        for tid in tids {
            match build_for_pairing(&pool, pairing, tid, target, rng) {
                Ok(set) => {
                    let key = PairSetKey { kind, pairing, tid };
                    if let Err(e) = persister.save(&key, target, &set) {
                        pb.finish_and_clear();
                        return Err(
                            e.context(format!("Failed to save {kind} pairs for topic {tid}"))
                        );
                    }
                    kind_summary.written += 1;
                    kind_summary.pairs += set.len();
                }
                Err(e) if policy == FailurePolicy::SkipTopic && e.is_data_error() => {
                    warn!(tid, kind = %kind, error = %e, "Skipping topic");
                    kind_summary.skipped.push((tid, e.to_string()));
                }
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(anyhow::Error::new(e)
                        .context(format!("Failed to build {kind} pairs for topic {tid}")));
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!(
            kind = %kind,
            written = kind_summary.written,
            skipped = kind_summary.skipped.len(),
            pairs = kind_summary.pairs,
            "Finished representation kind"
        );
        summary.kinds.push(kind_summary);
    }

    Ok(summary)
}
