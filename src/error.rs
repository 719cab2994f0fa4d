//! Errors raised while building a scoring configuration.
//!
//! Misuse of the counting core itself (merging counts of different max
//! order, an order index past the max order) panics instead.

use std::fmt;

/// Reasons a `ScoreConfig` is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// Variant name is not one of the known scorers.
    UnknownVariant(String),
    /// Max n-gram order must be at least 1.
    ZeroOrder,
    /// Weight vector length differs from the max order.
    WeightCount { expected: usize, found: usize },
    /// A weight is negative, NaN or infinite.
    InvalidWeight { order: usize, weight: f64 },
    /// Every weight is zero.
    ZeroWeights,
    /// The stupid BLEU floor must be positive and finite.
    InvalidFloor(f64),
    /// History decay must lie in `(0, 1]`.
    InvalidDecay(f64),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariant(name) => write!(
                f,
                "unknown score variant: {name:?} (expected \"bleu\", \"stupid_bleu\", \"smooth_bleu\" or \"approx_bleu\")"
            ),
            Self::ZeroOrder => write!(f, "max n-gram order must be at least 1"),
            Self::WeightCount { expected, found } => {
                write!(f, "expected {expected} n-gram weights, got {found}")
            }
            Self::InvalidWeight { order, weight } => {
                write!(f, "invalid weight {weight} for {order}-grams")
            }
            Self::ZeroWeights => write!(f, "n-gram weights sum to zero"),
            Self::InvalidFloor(floor) => write!(f, "stupid bleu floor must be positive, got {floor}"),
            Self::InvalidDecay(decay) => write!(f, "history decay must be in (0, 1], got {decay}"),
        }
    }
}

impl std::error::Error for ScoreError {}
