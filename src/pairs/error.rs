// Error taxonomy for pair construction.
//
// These are data or call-site problems, never transient ones, so nothing
// here is retried. The orchestration layer decides whether to skip a topic
// or abort the batch.

use thiserror::Error;

use super::sampler::TopicId;

/// Hard failures raised while validating inputs or building a pair set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    /// A representation or pairing kind string outside the known set.
    #[error("invalid {field}: '{value}' (expected one of: {expected})")]
    Validation {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// The designated topic has no representations to use as positives.
    #[error("no positive samples found for topic ID {0}")]
    EmptyPositiveSet(TopicId),

    /// No topic besides the designated one has any representation.
    #[error("no non-empty negative sample lists found for topic ID {0}")]
    NoNegatives(TopicId),

    /// The designated topic is not a key of the loaded pool.
    #[error("topic ID {0} is not present in the topic pool")]
    UnknownTopic(TopicId),
}

impl PairError {
    /// True for errors caused by the contents of the topic pool, as opposed
    /// to a bad call site. These are the ones a batch run may skip past.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, PairError::Validation { .. })
    }
}
