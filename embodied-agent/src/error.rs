//! Top-level error taxonomy for the embodiment layer, composing the geometry
//! and network crates' errors with element, controller and persistence faults.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error(transparent)]
    Geometry(#[from] arena_geometry::GeometryError),

    #[error(transparent)]
    Network(#[from] neural_dynamics::NeuralDynamicsError),

    /// A controller was constructed against motor regions that do not exist,
    /// or the wrong number of them.
    #[error("controller initialization failed: {0}")]
    ControllerInitialization(String),

    /// An element's requested state violates a declared speed or position envelope.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// A step reached a configuration the simulation declares impossible
    /// (e.g. the ball escaping through the Catch simulation's right wall).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A persisted configuration or result file did not deserialize to the
    /// expected shape.
    #[error("failed to load {path}: {message}")]
    Loading { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, AgentError>;
