// Pair sampler: builds (positive, negative) training pairs for one topic.
//
// The negative side is merged from every other topic by round-robin over
// position: round i takes element i from each topic that still has one, in
// pool order. Large topics therefore cannot crowd the front of the negative
// list, which matters because the candidate set is later subsampled.
//
// The candidate set is the cross-product positives × negatives, enumerated
// positive-major. It is never materialized when only a subsample is wanted:
// candidate k maps to (positives[k / n], negatives[k % n]).

use std::borrow::Cow;

use indexmap::IndexMap;
use rand::distr::{Alphanumeric, Distribution};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::error::PairError;

/// Topic identifier. Integer in memory; stringified only in JSON files.
pub type TopicId = u32;

/// Topic id → representation strings, in the order topics were loaded.
pub type TopicPool = IndexMap<TopicId, Vec<String>>;

/// One contrastive training example.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub positive: String,
    pub negative: String,
}

impl Pair {
    pub fn new(positive: impl Into<String>, negative: impl Into<String>) -> Self {
        Self {
            positive: positive.into(),
            negative: negative.into(),
        }
    }
}

/// The result of one sampler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSet {
    /// Selected pairs, in enumeration order when everything was returned,
    /// in draw order otherwise.
    pub pairs: Vec<Pair>,
    /// Size of the full candidate set the pairs were drawn from.
    pub total_candidates: usize,
}

impl PairSet {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// The full cross-product of positives and negatives, indexed lazily.
#[derive(Debug, Clone)]
pub struct CandidateSet<'a> {
    positives: &'a [String],
    negatives: Vec<Cow<'a, str>>,
}

impl<'a> CandidateSet<'a> {
    pub fn new(positives: &'a [String], negatives: Vec<Cow<'a, str>>) -> Self {
        Self {
            positives,
            negatives,
        }
    }

    /// Number of candidate pairs. Saturates rather than overflowing.
    pub fn len(&self) -> usize {
        self.positives.len().saturating_mul(self.negatives.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The candidate at position `index` in positive-major order.
    pub fn get(&self, index: usize) -> Option<Pair> {
        if index >= self.len() {
            return None;
        }
        let n = self.negatives.len();
        Some(Pair::new(
            self.positives[index / n].as_str(),
            &*self.negatives[index % n],
        ))
    }

    /// All candidates in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = Pair> + '_ {
        self.positives.iter().flat_map(move |pos| {
            self.negatives
                .iter()
                .map(move |neg| Pair::new(pos.as_str(), &**neg))
        })
    }

    /// Apply the count rule to this candidate set.
    ///
    /// - `target < 0`: empty result, logged as a warning.
    /// - `target >= len`: every candidate in enumeration order; a warning is
    ///   logged when `target` is strictly larger.
    /// - otherwise: a uniform sample of exactly `target` distinct candidates
    ///   without replacement, in the order drawn.
    pub fn select<R: Rng>(&self, target: i64, rng: &mut R) -> PairSet {
        select_candidates(self.len(), target, rng, |i| self.get(i))
    }
}

/// Count rule shared by every pairing kind, over candidates addressed by
/// index `0..total` in enumeration order.
fn select_candidates<R, F>(total: usize, target: i64, rng: &mut R, candidate: F) -> PairSet
where
    R: Rng,
    F: Fn(usize) -> Option<Pair>,
{
    if target < 0 {
        warn!(requested = target, "Requested pair count is negative, returning no pairs");
        return PairSet {
            pairs: Vec::new(),
            total_candidates: total,
        };
    }

    let wanted = usize::try_from(target).unwrap_or(usize::MAX);
    if wanted >= total {
        // Asking for exactly `total` is not an oversubscription: no warning,
        // and no random draw, so the order stays the enumeration order.
        if wanted > total {
            warn!(
                requested = target,
                total,
                "Requested pair count exceeds total possible pairs, returning all of them"
            );
        }
        return PairSet {
            pairs: (0..total).filter_map(&candidate).collect(),
            total_candidates: total,
        };
    }

    let pairs = rand::seq::index::sample(rng, total, wanted)
        .into_iter()
        .filter_map(&candidate)
        .collect();

    PairSet {
        pairs,
        total_candidates: total,
    }
}

/// Merge the representations of every topic except `positive_tid` by
/// round-robin over position, skipping empty and exhausted topics.
///
/// With negative topics A (3 items), B (1), C (2) in that pool order the
/// result is `A0, B0, C0, A1, C1, A2`.
pub fn interleave_negatives(pool: &TopicPool, positive_tid: TopicId) -> Vec<&str> {
    let lists: Vec<&[String]> = pool
        .iter()
        .filter(|(tid, reps)| **tid != positive_tid && !reps.is_empty())
        .map(|(_, reps)| reps.as_slice())
        .collect();

    let max_len = lists.iter().map(|l| l.len()).max().unwrap_or(0);
    let mut merged = Vec::with_capacity(lists.iter().map(|l| l.len()).sum());

    for i in 0..max_len {
        for list in &lists {
            if let Some(item) = list.get(i) {
                merged.push(item.as_str());
            }
        }
    }

    merged
}

fn positives_for(pool: &TopicPool, positive_tid: TopicId) -> Result<&[String], PairError> {
    let positives = pool.get(&positive_tid).ok_or_else(|| {
        error!(tid = positive_tid, "Topic not present in pool");
        PairError::UnknownTopic(positive_tid)
    })?;

    if positives.is_empty() {
        error!(tid = positive_tid, "No positive samples found");
        return Err(PairError::EmptyPositiveSet(positive_tid));
    }

    Ok(positives)
}

/// Build up to `target` pairs for `positive_tid`, with negatives taken from
/// every other topic in the pool.
pub fn build_pairs<R: Rng>(
    pool: &TopicPool,
    positive_tid: TopicId,
    target: i64,
    rng: &mut R,
) -> Result<PairSet, PairError> {
    let positives = positives_for(pool, positive_tid)?;

    let negatives = interleave_negatives(pool, positive_tid);
    if negatives.is_empty() {
        error!(tid = positive_tid, "No non-empty negative sample lists found");
        return Err(PairError::NoNegatives(positive_tid));
    }

    let negatives = negatives.into_iter().map(Cow::Borrowed).collect();
    Ok(CandidateSet::new(positives, negatives).select(target, rng))
}

/// Build up to `target` pairs for `positive_tid`, pairing each positive
/// with a random alphanumeric string of the same character length.
///
/// One string is generated per positive and paired only with that
/// positive, so the candidate set has one pair per positive, in positive
/// order, and follows the same count rule as [`build_pairs`]. Other topics
/// in the pool are not consulted.
pub fn build_random_string_pairs<R: Rng>(
    pool: &TopicPool,
    positive_tid: TopicId,
    target: i64,
    rng: &mut R,
) -> Result<PairSet, PairError> {
    let positives = positives_for(pool, positive_tid)?;

    let candidates: Vec<Pair> = positives
        .iter()
        .map(|pos| {
            let negative = random_string(pos.chars().count().max(1), &mut *rng);
            Pair::new(pos.as_str(), negative)
        })
        .collect();

    Ok(select_candidates(candidates.len(), target, rng, |i| {
        candidates.get(i).cloned()
    }))
}

fn random_string<R: Rng>(len: usize, rng: &mut R) -> String {
    (0..len).map(|_| char::from(Alphanumeric.sample(&mut *rng))).collect()
}
