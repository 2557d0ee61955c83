//! Rectangular shape, grounded on `simulation/geometry/rectangle.py` in the original implementation.

use std::any::Any;

use crate::circle::Circle;
use crate::error::{GeometryError, Result};
use crate::shape::{Shape, TOLERANCE};
use crate::vector::Vector2D;

const EDGE_COUNT: usize = 4;

/// An axis-aligned (in its own local frame) rectangle, usable as a paddle shape.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Rectangle {
    pub center: Vector2D,
    pub width: f64,
    pub height: f64,
    pub orientation: f64,
    perimeter_points: [Vector2D; EDGE_COUNT],
    edge_normals: [Vector2D; EDGE_COUNT],
    edge_offsets: [f64; EDGE_COUNT],
}

impl Rectangle {
    pub fn new(center: Vector2D, width: f64, height: f64, orientation: f64) -> Self {
        let perimeter_points = [
            Vector2D::new(width / 2.0, height / 2.0),
            Vector2D::new(width / 2.0, -height / 2.0),
            Vector2D::new(-width / 2.0, -height / 2.0),
            Vector2D::new(-width / 2.0, height / 2.0),
        ];

        let mut edge_normals = [Vector2D::ZERO; EDGE_COUNT];
        let mut edge_offsets = [0.0; EDGE_COUNT];
        for i in 0..EDGE_COUNT {
            let p1 = perimeter_points[(i + EDGE_COUNT - 1) % EDGE_COUNT];
            let p2 = perimeter_points[i];
            let normal = (p2 - p1).rotate(90.0).unit();
            edge_normals[i] = normal;
            edge_offsets[i] = perimeter_points[i].dot(normal);
        }

        Self {
            center,
            width,
            height,
            orientation,
            perimeter_points,
            edge_normals,
            edge_offsets,
        }
    }

}

impl Shape for Rectangle {
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
        self.orientation
    }

    fn rotate(&mut self, angle_degrees: f64) {
        self.orientation += angle_degrees;
    }

    fn contains_point(&self, point: Vector2D) -> bool {
        let local = self.to_local(point);
        (-self.width / 2.0..=self.width / 2.0).contains(&local.x)
            && (-self.height / 2.0..=self.height / 2.0).contains(&local.y)
    }

    fn collides_with(&self, other: &dyn Shape) -> bool {
        crate::collision::collide(self, other)
    }

    fn closest_point(&self, local_point: Vector2D) -> Vector2D {
        let closest_x = local_point.x.clamp(-self.width / 2.0, self.width / 2.0);
        let closest_y = local_point.y.clamp(-self.height / 2.0, self.height / 2.0);
        Vector2D::new(closest_x, closest_y)
    }

    fn edge_normal(&self, local_point: Vector2D) -> Result<Vector2D> {
        for i in 0..EDGE_COUNT {
            if (local_point.dot(self.edge_normals[i]) - self.edge_offsets[i]).abs() <= TOLERANCE {
                return Ok(self.edge_normals[i]);
            }
        }
        Err(GeometryError::NotOnEdge)
    }

    fn perimeter_corners(&self) -> Result<Vec<Vector2D>> {
        Ok(self
            .perimeter_points
            .iter()
            .map(|p| self.to_global(*p))
            .collect())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Rectangle-vs-circle collision: checks whether the circle's closest point on
/// the rectangle's perimeter is within the circle's radius.
pub(crate) fn collides_with_circle(rect: &Rectangle, circle: &Circle) -> bool {
    let local_center = rect.to_local(circle.center);
    let closest = rect.closest_point(local_center);
    (local_center - closest).squared_norm() <= circle.radius * circle.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point() {
        let r = Rectangle::new(Vector2D::new(0.0, 0.0), 4.0, 2.0, 0.0);
        assert!(r.contains_point(Vector2D::new(1.0, 0.5)));
        assert!(!r.contains_point(Vector2D::new(3.0, 0.5)));
    }

    #[test]
    fn test_perimeter_corners_count() {
        let r = Rectangle::new(Vector2D::new(0.0, 0.0), 4.0, 2.0, 0.0);
        assert_eq!(r.perimeter_corners().unwrap().len(), 4);
    }

    #[test]
    fn test_edge_normal_front_face() {
        let r = Rectangle::new(Vector2D::new(0.0, 0.0), 4.0, 2.0, 0.0);
        let n = r.edge_normal(Vector2D::new(2.0, 0.5)).unwrap();
        assert_eq!(n, Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_closest_point() {
        let r = Rectangle::new(Vector2D::new(0.0, 0.0), 4.0, 2.0, 0.0);
        let closest = r.closest_point(Vector2D::new(5.0, 5.0));
        assert_eq!(closest, Vector2D::new(2.0, 1.0));
    }

    #[test]
    fn test_collides_with_circle() {
        let r = Rectangle::new(Vector2D::new(0.0, 0.0), 4.0, 2.0, 0.0);
        let c = Circle::new(Vector2D::new(3.0, 0.0), 1.5);
        assert!(collides_with_circle(&r, &c));
        let far = Circle::new(Vector2D::new(10.0, 0.0), 1.0);
        assert!(!collides_with_circle(&r, &far));
    }
}
