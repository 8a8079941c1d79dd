//! Errors reported by the counter, the normalizer, the override operations and the sampler.
//!
//! None of these are transient: retrying the same call with the same input fails the same way.

use thiserror::Error;

use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BigramError {
    /// A token had to be drawn from the corpus, but the corpus has no tokens.
    #[error("cannot draw a token from an empty corpus")]
    EmptyCorpus,

    /// An override supplied a negative or non-finite weight. The entry is left unchanged.
    #[error("invalid weight {weight} for {predecessor:?} -> {successor:?}")]
    InvalidWeight {
        predecessor: Token,
        successor: Token,
        weight: f64,
    },

    /// An override would leave a predecessor with nothing to sample: no successors, all weights
    /// zero, or a total that overflows. The entry is left unchanged.
    #[error("distribution for {predecessor:?} has no positive finite total weight")]
    NoPositiveWeight { predecessor: Token },

    /// Counts contained a predecessor without any successor. The counter never produces one.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

pub type Result<T, E = BigramError> = std::result::Result<T, E>;
