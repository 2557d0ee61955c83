//! Shape-vs-shape collision dispatch.
//!
//! Ball elements are always circles and paddle elements may be any polygon or circle, so the
//! only pairings that occur in practice are circle-circle and circle-polygon. Dispatch is done
//! by downcasting through `std::any::Any` rather than double dispatch through the trait, mirroring
//! the original implementation's `isinstance` checks in `Shape.collides_with`.

use crate::circle::Circle;
use crate::rectangle::{self, Rectangle};
use crate::shape::Shape;
use crate::triangle::{self, IsoscelesTriangle};

pub fn collide(a: &dyn Shape, b: &dyn Shape) -> bool {
    if let (Some(a), Some(b)) = (downcast_circle(a), downcast_circle(b)) {
        return (a.center - b.center).squared_norm() <= (a.radius + b.radius).powi(2);
    }
    if let Some(circle) = downcast_circle(a) {
        return collide_polygon_with_circle(b, circle);
    }
    if let Some(circle) = downcast_circle(b) {
        return collide_polygon_with_circle(a, circle);
    }
    // Polygon-vs-polygon: corner-containment test, matching the original's fallback branch.
    a.perimeter_corners()
        .map(|corners| corners.iter().any(|c| b.contains_point(*c)))
        .unwrap_or(false)
        || b.perimeter_corners()
            .map(|corners| corners.iter().any(|c| a.contains_point(*c)))
            .unwrap_or(false)
}

fn collide_polygon_with_circle(polygon: &dyn Shape, circle: &Circle) -> bool {
    if let Some(rect) = downcast_rectangle(polygon) {
        return rectangle::collides_with_circle(rect, circle);
    }
    if let Some(tri) = downcast_triangle(polygon) {
        return triangle::collides_with_circle(tri, circle);
    }
    false
}

fn downcast_circle(shape: &dyn Shape) -> Option<&Circle> {
    shape.as_any().downcast_ref::<Circle>()
}

fn downcast_rectangle(shape: &dyn Shape) -> Option<&Rectangle> {
    shape.as_any().downcast_ref::<Rectangle>()
}

fn downcast_triangle(shape: &dyn Shape) -> Option<&IsoscelesTriangle> {
    shape.as_any().downcast_ref::<IsoscelesTriangle>()
}
