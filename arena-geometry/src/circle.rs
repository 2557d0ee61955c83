//! Circular shape, grounded on `simulation/geometry/circle.py` in the original implementation.

use std::any::Any;

use crate::error::{GeometryError, Result};
use crate::shape::{Shape, TOLERANCE};
use crate::vector::Vector2D;

/// A circle defined by its center and radius. Ball elements use this shape exclusively.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Circle {
    pub center: Vector2D,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Vector2D, radius: f64) -> Self {
        Self { center, radius }
    }

}

impl Shape for Circle {
    fn center(&self) -> Vector2D {
        self.center
    }

    fn move_center(&mut self, translation: Vector2D) {
        self.center += translation;
    }

    fn set_center(&mut self, center: Vector2D) {
        self.center = center;
    }

    fn orientation(&self) -> f64 {
        0.0
    }

    fn rotate(&mut self, _angle_degrees: f64) {}

    fn contains_point(&self, point: Vector2D) -> bool {
        (point - self.center).squared_norm() <= (self.radius + TOLERANCE).powi(2)
    }

    fn collides_with(&self, other: &dyn Shape) -> bool {
        crate::collision::collide(self, other)
    }

    fn closest_point(&self, local_point: Vector2D) -> Vector2D {
        (self.radius / local_point.norm()) * local_point
    }

    fn edge_normal(&self, local_point: Vector2D) -> Result<Vector2D> {
        if (local_point.squared_norm() - self.radius * self.radius).abs() <= TOLERANCE * TOLERANCE
        {
            Ok(local_point.unit())
        } else {
            Err(GeometryError::NotOnEdge)
        }
    }

    fn perimeter_corners(&self) -> Result<Vec<Vector2D>> {
        Err(GeometryError::CurvedEdge)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
