//! Error types for neuron, region and connectivity construction.

use thiserror::Error;

/// Errors raised while building or validating a spiking network's static structure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpikingNetworkError {
    /// A requested transmission average lies outside the open interval `(0, 1)`.
    #[error("invalid transmission average {0}: must lie in (0, 1)")]
    InvalidAverage(f32),

    /// A declared region size did not match the number of indices assigned to it.
    #[error("size mismatch: expected {expected} neurons, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    /// Region names were not unique, or a connectome entry referenced an unknown region.
    #[error("network initialization failed: {0}")]
    NetworkInitialization(String),

    /// A communication/assembly step failed on one or more named regions.
    #[error("communication error on regions {0:?}")]
    Communication(Vec<String>),
}

/// Result type for spiking-network operations.
pub type Result<T> = std::result::Result<T, SpikingNetworkError>;
