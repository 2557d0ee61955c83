//! Error types for the recurrent network layer.

use thiserror::Error;

/// Errors that can occur while assembling or driving a [`crate::Network`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NeuralDynamicsError {
    /// Propagated from region/conformation validation at construction time.
    #[error(transparent)]
    Initialization(#[from] spiking_network::SpikingNetworkError),

    /// A propagation or motor-decoding call named one or more unknown regions,
    /// or supplied a state vector whose length did not match the region's size.
    #[error("communication error on regions {0:?}")]
    Communication(Vec<String>),
}

/// Result type for neural dynamics operations.
pub type Result<T> = std::result::Result<T, NeuralDynamicsError>;
