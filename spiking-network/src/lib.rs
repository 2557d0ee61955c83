//! Stochastic spiking neuron states, named regions and probabilistic connectivity
//! generation: the static building blocks a recurrent network is assembled from.
//!
//! - [`neuron`] defines the four-phase neuron state machine.
//! - [`region`] groups neuron indices into named, internal-or-external blocks.
//! - [`graph_generation`] produces row-normalized edge-probability matrices.
//! - [`conformation`] stores the dense connectivity matrix those probabilities feed into.

pub mod conformation;
pub mod error;
pub mod graph_generation;
pub mod neuron;
pub mod region;

pub use conformation::Conformation;
pub use error::{Result, SpikingNetworkError};
pub use neuron::NeuronState;
pub use region::{validate_regions, Region, RegionKind};
