//! The recurrent layer: a [`Network`] of [`spiking_network::NeuronState`] neurons
//! wired by a [`spiking_network::Conformation`] matrix, driven by stochastic
//! propagation and free-energy-seeking plasticity.
//!
//! - [`params`] holds the tunable constants a network is built with.
//! - [`network`] implements propagation, plasticity, reward/punish replay,
//!   free energy and motor decoding.

pub mod error;
pub mod network;
pub mod params;

pub use error::{NeuralDynamicsError, Result};
pub use network::{Network, SensorySignal};
pub use params::NetworkParams;

pub use spiking_network::{Conformation, NeuronState, Region, RegionKind};
