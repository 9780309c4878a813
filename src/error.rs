use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankError>;

/// Shape and precondition violations surfaced to the caller. Numeric edge
/// cases (degenerate score ranges, empty aggregates, missing priors) are
/// absorbed inside the layers with documented defaults and never error.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("score vector misaligned with candidates: expected {expected}, got {got}")]
    ScoreAlignment { expected: usize, got: usize },

    #[error("limit must be at least 1")]
    InvalidLimit,
}
