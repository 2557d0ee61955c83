//! Isosceles triangle shape, grounded on `simulation/geometry/triangle.py` in the original
//! implementation, generalized to the edge-normal-lookup approach used for every polygon
//! (see `Rectangle`) rather than the original's triangle-specific incentre-orientation branch.

use std::any::Any;

use crate::circle::Circle;
use crate::error::{GeometryError, Result};
use crate::shape::{Shape, TOLERANCE};
use crate::vector::Vector2D;

const EDGE_COUNT: usize = 3;

/// An isosceles triangle whose base is parallel to the local y-axis and whose apex points
/// along the positive local x-axis.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IsoscelesTriangle {
    pub center: Vector2D,
    pub base: f64,
    pub height: f64,
    pub orientation: f64,
    vertices: [Vector2D; EDGE_COUNT],
    edge_normals: [Vector2D; EDGE_COUNT],
    edge_offsets: [f64; EDGE_COUNT],
}

impl IsoscelesTriangle {
    pub fn new(center: Vector2D, base: f64, height: f64, orientation: f64) -> Self {
        let vertices = [
            Vector2D::new(height / 2.0, 0.0),
            Vector2D::new(-height / 2.0, base / 2.0),
            Vector2D::new(-height / 2.0, -base / 2.0),
        ];

        let centroid = (1.0 / 3.0) * (vertices[0] + vertices[1] + vertices[2]);

        let mut edge_normals = [Vector2D::ZERO; EDGE_COUNT];
        let mut edge_offsets = [0.0; EDGE_COUNT];
        for i in 0..EDGE_COUNT {
            let p1 = vertices[i];
            let p2 = vertices[(i + 1) % EDGE_COUNT];
            let mut normal = (p2 - p1).rotate(90.0).unit();
            // Flip so the normal points away from the triangle's centroid.
            let midpoint = 0.5 * (p1 + p2);
            if (midpoint - centroid).dot(normal) < 0.0 {
                normal = -normal;
            }
            edge_normals[i] = normal;
            edge_offsets[i] = p1.dot(normal);
        }

        Self {
            center,
            base,
            height,
            orientation,
            vertices,
            edge_normals,
            edge_offsets,
        }
    }

    fn barycentric(&self, point: Vector2D) -> (f64, f64, f64) {
        let (v0, v1, v2) = (self.vertices[0], self.vertices[1], self.vertices[2]);
        let a1 = v1 - v0;
        let a2 = v2 - v0;
        let b = point - v0;

        let det = a1.x * a2.y - a1.y * a2.x;
        let lambda1 = (b.x * a2.y - b.y * a2.x) / det;
        let lambda2 = (a1.x * b.y - a1.y * b.x) / det;
        let lambda0 = 1.0 - lambda1 - lambda2;
        (lambda0, lambda1, lambda2)
    }

    /// Closest point to `local_point` on a single edge segment `(a, b)`.
    fn closest_on_segment(local_point: Vector2D, a: Vector2D, b: Vector2D) -> Vector2D {
        let edge = b - a;
        let t = ((local_point - a).dot(edge) / edge.squared_norm()).clamp(0.0, 1.0);
        a + t * edge
    }
}

impl Shape for IsoscelesTriangle {
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
        let (l0, l1, l2) = self.barycentric(local);
        (0.0..=1.0).contains(&l0) && (0.0..=1.0).contains(&l1) && (0.0..=1.0).contains(&l2)
    }

    fn collides_with(&self, other: &dyn Shape) -> bool {
        crate::collision::collide(self, other)
    }

    fn closest_point(&self, local_point: Vector2D) -> Vector2D {
        (0..EDGE_COUNT)
            .map(|i| {
                Self::closest_on_segment(
                    local_point,
                    self.vertices[i],
                    self.vertices[(i + 1) % EDGE_COUNT],
                )
            })
            .min_by(|a, b| {
                (local_point - *a)
                    .squared_norm()
                    .total_cmp(&(local_point - *b).squared_norm())
            })
            .expect("triangle always has three edges")
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
        Ok(self.vertices.iter().map(|v| self.to_global(*v)).collect())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn collides_with_circle(triangle: &IsoscelesTriangle, circle: &Circle) -> bool {
    let local_center = triangle.to_local(circle.center);
    let closest = triangle.closest_point(local_center);
    (local_center - closest).squared_norm() <= circle.radius * circle.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_apex() {
        let t = IsoscelesTriangle::new(Vector2D::new(0.0, 0.0), 4.0, 6.0, 0.0);
        assert!(t.contains_point(Vector2D::new(2.9, 0.0)));
        assert!(!t.contains_point(Vector2D::new(10.0, 0.0)));
    }

    #[test]
    fn test_perimeter_corners_count() {
        let t = IsoscelesTriangle::new(Vector2D::new(0.0, 0.0), 4.0, 6.0, 0.0);
        assert_eq!(t.perimeter_corners().unwrap().len(), 3);
    }

    #[test]
    fn test_collides_with_circle_near_apex() {
        let t = IsoscelesTriangle::new(Vector2D::new(0.0, 0.0), 4.0, 6.0, 0.0);
        let c = Circle::new(Vector2D::new(4.0, 0.0), 1.5);
        assert!(collides_with_circle(&t, &c));
        let far = Circle::new(Vector2D::new(20.0, 0.0), 1.0);
        assert!(!collides_with_circle(&t, &far));
    }
}
