//! Paddle-controller embodiment of a [`neural_dynamics::Network`] in a 2D
//! arcade arena. Wires elements, controllers, and sensory translation around
//! the network the `neural-dynamics` crate already implements.

pub mod config;
pub mod controller;
pub mod element;
pub mod error;
pub mod results;
pub mod simulation;
pub mod translator;

pub use config::{RunConfig, SimulationConfig, SimulationKind};
pub use controller::{Controller, ConstantSpeedNetworkController, PidController, RandomWalkerController};
pub use element::{Ball, Element, Paddle};
pub use error::{AgentError, Result};
pub use results::{JsonResultWriter, ResultWriter, RunResults, SuccessRecord};
pub use simulation::catch::CatchSimulation;
pub use simulation::pong::PongSimulation;
pub use translator::SignalTranslator;
