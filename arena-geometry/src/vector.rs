//! 2D vector type used for both positions and velocities throughout the arena.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 2D vector (also used to represent points).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean squared norm.
    pub fn squared_norm(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Rotates the vector around the origin by `angle_degrees`.
    pub fn rotate(&self, angle_degrees: f64) -> Vector2D {
        let angle = angle_degrees.to_radians();
        let (sin, cos) = angle.sin_cos();
        Vector2D::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Orientation of the vector in degrees, normalized to `[0, 360)`.
    pub fn orientation(&self) -> f64 {
        let mut angle = if self.x == 0.0 {
            if self.y > 0.0 {
                90.0
            } else if self.y < 0.0 {
                -90.0
            } else {
                0.0
            }
        } else {
            let mut a = (self.y / self.x).atan().to_degrees();
            if self.x < 0.0 {
                a += 180.0;
            }
            a
        };
        if angle < 0.0 {
            angle += 360.0;
        }
        angle
    }

    /// Returns the unit vector in the same direction. Undefined for the zero vector.
    pub fn unit(&self) -> Vector2D {
        (1.0 / self.norm()) * *self
    }

    /// Projection of `self` onto `axis`.
    pub fn projection(&self, axis: Vector2D) -> Vector2D {
        (self.dot(axis) / axis.squared_norm()) * axis
    }

    /// Reflection of `self` about the axis defined by `axis`.
    pub fn reflection(&self, axis: Vector2D) -> Vector2D {
        *self - 2.0 * self.projection(axis)
    }

    /// Approximate equality within `tolerance` on the squared distance.
    pub fn approx_eq(&self, other: Vector2D, tolerance: f64) -> bool {
        (*self - other).squared_norm() <= tolerance * tolerance
    }
}

impl Add for Vector2D {
    type Output = Vector2D;
    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Vector2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;
    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2D {
    type Output = Vector2D;
    fn neg(self) -> Vector2D {
        Vector2D::new(-self.x, -self.y)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;
    fn mul(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self * rhs.x, self * rhs.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;
    fn mul(self, rhs: f64) -> Vector2D {
        Vector2D::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_add_sub_neg() {
        let a = Vector2D::new(1.0, 2.0);
        let b = Vector2D::new(3.0, -1.0);
        assert_eq!(a + b, Vector2D::new(4.0, 1.0));
        assert_eq!(a - b, Vector2D::new(-2.0, 3.0));
        assert_eq!(-a, Vector2D::new(-1.0, -2.0));
    }

    #[test]
    fn test_norm_and_dot() {
        let v = Vector2D::new(3.0, 4.0);
        assert_relative_eq!(v.norm(), 5.0);
        assert_relative_eq!(v.dot(Vector2D::new(1.0, 0.0)), 3.0);
    }

    #[test]
    fn test_rotate_90_degrees() {
        let v = Vector2D::new(1.0, 0.0);
        let rotated = v.rotate(90.0);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reflection_over_vertical_axis() {
        let v = Vector2D::new(1.0, 1.0);
        let reflected = v.reflection(Vector2D::new(0.0, 1.0));
        assert_relative_eq!(reflected.x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(reflected.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_projection() {
        let v = Vector2D::new(2.0, 2.0);
        let proj = v.projection(Vector2D::new(1.0, 0.0));
        assert_relative_eq!(proj.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(proj.y, 0.0, epsilon = 1e-9);
    }

    proptest! {
        #[test]
        fn rotate_by_angle_then_its_negation_is_identity(
            x in -1e3f64..1e3,
            y in -1e3f64..1e3,
            angle in -720.0f64..720.0,
        ) {
            let v = Vector2D::new(x, y);
            let round_tripped = v.rotate(angle).rotate(-angle);
            prop_assert!(round_tripped.approx_eq(v, 1e-6));
        }

        #[test]
        fn rotation_preserves_norm(
            x in -1e3f64..1e3,
            y in -1e3f64..1e3,
            angle in -720.0f64..720.0,
        ) {
            let v = Vector2D::new(x, y);
            prop_assert!((v.rotate(angle).norm() - v.norm()).abs() <= 1e-6 * (v.norm().max(1.0)));
        }
    }
}
