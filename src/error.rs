use thiserror::Error;

/// Reasons a weight snapshot cannot be turned into a [`WeightDistribution`].
///
/// [`WeightDistribution`]: crate::WeightDistribution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidWeights {
    #[error("weights slice is empty")]
    Empty,
    #[error("weights contain a negative value at index {index}: {value}")]
    Negative { index: usize, value: f64 },
    #[error("weights contain a non-finite value at index {index}: {value}")]
    NonFinite { index: usize, value: f64 },
    #[error("sum of weights is zero")]
    ZeroSum,
}
