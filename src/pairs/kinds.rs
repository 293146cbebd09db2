// Representation and pairing kinds.
//
// Both are closed sets. Strings coming from the CLI, config files or
// persisted metadata are parsed into these enums once, at the boundary,
// and everything downstream works with the typed value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PairError;

/// Granularity of text used to characterize a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentationKind {
    Words,
    Phrases,
    Descriptions,
    Summaries,
}

impl RepresentationKind {
    pub const ALL: [RepresentationKind; 4] = [
        RepresentationKind::Words,
        RepresentationKind::Phrases,
        RepresentationKind::Descriptions,
        RepresentationKind::Summaries,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RepresentationKind::Words => "words",
            RepresentationKind::Phrases => "phrases",
            RepresentationKind::Descriptions => "descriptions",
            RepresentationKind::Summaries => "summaries",
        }
    }
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RepresentationKind {
    type Err = PairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_representation_kind(s)
    }
}

/// Strategy for choosing the negative side of each pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingKind {
    /// Negatives are representations of every other topic, interleaved.
    #[default]
    AgainstRandomTopicRepresentation,
    /// Negatives are random strings matching each positive's length.
    AgainstRandomString,
}

impl PairingKind {
    pub const ALL: [PairingKind; 2] = [
        PairingKind::AgainstRandomTopicRepresentation,
        PairingKind::AgainstRandomString,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PairingKind::AgainstRandomTopicRepresentation => "against_random_topic_representation",
            PairingKind::AgainstRandomString => "against_random_string",
        }
    }
}

impl fmt::Display for PairingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PairingKind {
    type Err = PairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_pairing_kind(s)
    }
}

/// Parse a representation kind, failing with `PairError::Validation` for
/// anything outside the known set. Matching is exact.
pub fn validate_representation_kind(value: &str) -> Result<RepresentationKind, PairError> {
    RepresentationKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == value)
        .ok_or_else(|| PairError::Validation {
            field: "representation kind",
            value: value.to_string(),
            expected: expected_list(RepresentationKind::ALL.map(RepresentationKind::as_str)),
        })
}

/// Parse a pairing kind, failing with `PairError::Validation` for anything
/// outside the known set.
pub fn validate_pairing_kind(value: &str) -> Result<PairingKind, PairError> {
    PairingKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == value)
        .ok_or_else(|| PairError::Validation {
            field: "pairing kind",
            value: value.to_string(),
            expected: expected_list(PairingKind::ALL.map(PairingKind::as_str)),
        })
}

fn expected_list<const N: usize>(names: [&str; N]) -> String {
    names.join(", ")
}
