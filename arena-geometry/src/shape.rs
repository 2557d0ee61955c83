//! Shape trait shared by every geometric primitive in the arena.

use crate::error::Result;
use crate::vector::Vector2D;

/// Common behavior of every shape: a center, an orientation, and the queries
/// needed to resolve collisions between elements.
pub trait Shape: std::fmt::Debug {
    /// The shape's center, in global coordinates.
    fn center(&self) -> Vector2D;

    /// Moves the shape's center by `translation`.
    fn move_center(&mut self, translation: Vector2D);

    /// Sets the shape's center directly.
    fn set_center(&mut self, center: Vector2D);

    /// The shape's orientation, in degrees.
    fn orientation(&self) -> f64;

    /// Rotates the shape around its center by `angle_degrees`.
    fn rotate(&mut self, angle_degrees: f64);

    /// Translates a global point into this shape's local frame.
    fn to_local(&self, point: Vector2D) -> Vector2D {
        (point - self.center()).rotate(-self.orientation())
    }

    /// Translates a local point back into global coordinates.
    fn to_global(&self, point: Vector2D) -> Vector2D {
        point.rotate(self.orientation()) + self.center()
    }

    /// Whether `point` (global coordinates) lies inside the shape.
    fn contains_point(&self, point: Vector2D) -> bool;

    /// Whether this shape collides with `other`.
    fn collides_with(&self, other: &dyn Shape) -> bool;

    /// The perimeter point (in this shape's local frame) closest to `local_point`.
    fn closest_point(&self, local_point: Vector2D) -> Vector2D;

    /// The outward unit normal, in local coordinates, of the edge containing
    /// `local_point` (which must lie on the perimeter).
    fn edge_normal(&self, local_point: Vector2D) -> Result<Vector2D>;

    /// The shape's perimeter corners, in global coordinates. Curved shapes
    /// return `GeometryError::CurvedEdge`.
    fn perimeter_corners(&self) -> Result<Vec<Vector2D>>;

    /// Enables downcasting to a concrete shape type for collision dispatch.
    fn as_any(&self) -> &dyn std::any::Any;
}

pub(crate) const TOLERANCE: f64 = 1e-6;
