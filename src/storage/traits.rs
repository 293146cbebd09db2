// Storage traits: the seams between the sampler and the filesystem.
//
// The sampler itself never touches storage. The orchestration layer loads a
// pool through a `RepresentationLoader`, builds pairs, and hands the result
// to a `PairPersister`. Tests plug in-memory implementations in here.

use anyhow::Result;

use crate::pairs::kinds::{PairingKind, RepresentationKind};
use crate::pairs::sampler::{PairSet, TopicId, TopicPool};

/// Identifies one persisted pair set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairSetKey {
    pub kind: RepresentationKind,
    pub pairing: PairingKind,
    pub tid: TopicId,
}

/// Source of topic pools, one per representation kind.
pub trait RepresentationLoader {
    /// Load the full pool for `kind`. Missing or corrupt storage is an error.
    fn load(&self, kind: RepresentationKind) -> Result<TopicPool>;
}

/// Durable sink for built pair sets.
pub trait PairPersister {
    /// Store `set` under `key`. `requested` is the count the caller asked
    /// for, kept alongside the pairs for provenance.
    fn save(&self, key: &PairSetKey, requested: i64, set: &PairSet) -> Result<()>;
}
