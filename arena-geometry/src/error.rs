//! Error types for shape queries.

use thiserror::Error;

/// Errors raised by shape queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Attempted to enumerate perimeter corners of a curved shape.
    #[error("curved shapes have no defined corners")]
    CurvedEdge,

    /// A point was expected to lie on a shape's perimeter but does not.
    #[error("point does not lie on this shape's perimeter")]
    NotOnEdge,
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
