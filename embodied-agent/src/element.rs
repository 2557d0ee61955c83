//! Moving bodies in the arena: balls and paddles, grounded on
//! `simulation/elements/{base_element,ball,paddle}.py` in the original implementation.

use arena_geometry::{Shape, Vector2D};

use crate::error::{AgentError, Result};

/// A body with a shape, a speed and an acceleration, updated once per tick.
pub trait Element: std::fmt::Debug {
    fn shape(&self) -> &dyn Shape;
    fn shape_mut(&mut self) -> &mut dyn Shape;
    fn speed(&self) -> Vector2D;
    fn set_speed(&mut self, speed: Vector2D);
    fn acceleration(&self) -> Vector2D;

    /// Translates the shape by the current speed, then accumulates acceleration into it.
    fn update(&mut self) {
        let speed = self.speed();
        self.shape_mut().move_center(speed);
        self.set_speed(speed + self.acceleration());
    }

    fn position(&self) -> Vector2D {
        self.shape().center()
    }

    fn collides_with(&self, other: &dyn Element) -> bool {
        self.shape().collides_with(other.shape())
    }
}

/// A circular element with a speed-magnitude envelope, used for the ball.
#[derive(Debug, Clone)]
pub struct Ball {
    shape: arena_geometry::Circle,
    speed: Vector2D,
    acceleration: Vector2D,
    speed_envelope: (f64, f64),
}

impl Ball {
    pub fn new(
        shape: arena_geometry::Circle,
        speed: Vector2D,
        acceleration: Vector2D,
        speed_envelope: (f64, f64),
    ) -> Result<Self> {
        let (min, max) = speed_envelope;
        if min > max {
            return Err(AgentError::OutOfBounds(format!(
                "speed envelope minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self {
            shape,
            speed,
            acceleration,
            speed_envelope,
        })
    }

    fn adjust_speed(&mut self) {
        let (min, max) = self.speed_envelope;
        let norm = self.speed.norm();
        if norm > 0.0 && norm < min {
            self.speed = (min / norm) * self.speed;
        } else if norm > max {
            self.speed = (max / norm) * self.speed;
        }
    }

    /// Replaces the ball's position and/or speed, validating speed against the envelope.
    pub fn set_state(&mut self, position: Option<Vector2D>, speed: Option<Vector2D>) -> Result<()> {
        if let Some(s) = speed {
            let (min, max) = self.speed_envelope;
            let norm = s.norm();
            if !(min..=max).contains(&norm) {
                return Err(AgentError::OutOfBounds(format!(
                    "speed norm {norm} outside envelope [{min}, {max}]"
                )));
            }
            self.speed = s;
        }
        if let Some(p) = position {
            self.shape.set_center(p);
        }
        Ok(())
    }
}

impl Element for Ball {
    fn shape(&self) -> &dyn Shape {
        &self.shape
    }

    fn shape_mut(&mut self) -> &mut dyn Shape {
        &mut self.shape
    }

    fn speed(&self) -> Vector2D {
        self.speed
    }

    fn set_speed(&mut self, speed: Vector2D) {
        self.speed = speed;
    }

    fn acceleration(&self) -> Vector2D {
        self.acceleration
    }

    fn update(&mut self) {
        let speed = self.speed;
        self.shape.move_center(speed);
        self.speed = speed + self.acceleration;
        self.adjust_speed();
    }
}

/// A controller that does nothing; used as a placeholder while a paddle's real
/// controller is temporarily moved out during `Paddle::step`.
#[derive(Debug)]
struct NoopController;

impl crate::controller::Controller for NoopController {
    fn update(
        &mut self,
        _controlled: &mut dyn Element,
        _rng: &mut rand::rngs::StdRng,
    ) -> Result<()> {
        Ok(())
    }
}

/// An element whose vertical motion is driven by a [`crate::controller::Controller`]
/// and clamped to a `y` range.
pub struct Paddle {
    shape: Box<dyn Shape>,
    speed: Vector2D,
    acceleration: Vector2D,
    y_range: (f64, f64),
    controller: Box<dyn crate::controller::Controller>,
}

impl std::fmt::Debug for Paddle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paddle")
            .field("shape", &self.shape)
            .field("speed", &self.speed)
            .field("y_range", &self.y_range)
            .finish()
    }
}

impl Paddle {
    pub fn new(
        shape: Box<dyn Shape>,
        controller: Box<dyn crate::controller::Controller>,
        y_range: (f64, f64),
    ) -> Result<Self> {
        let (min_y, max_y) = y_range;
        if min_y > max_y {
            return Err(AgentError::OutOfBounds(format!(
                "y range minimum {min_y} exceeds maximum {max_y}"
            )));
        }
        Ok(Self {
            shape,
            speed: Vector2D::ZERO,
            acceleration: Vector2D::ZERO,
            y_range,
            controller,
        })
    }

    fn adjust_position(&mut self) {
        let (min_y, max_y) = self.y_range;
        let y = self.shape.center().y;
        if y < min_y {
            self.shape.move_center(Vector2D::new(0.0, min_y - y));
            self.speed.y = 0.0;
        } else if y > max_y {
            self.shape.move_center(Vector2D::new(0.0, max_y - y));
            self.speed.y = 0.0;
        }
    }

    pub fn set_state(&mut self, position: Option<Vector2D>) -> Result<()> {
        if let Some(p) = position {
            let (min_y, max_y) = self.y_range;
            if !(min_y..=max_y).contains(&p.y) {
                return Err(AgentError::OutOfBounds(format!(
                    "position y {} outside range [{min_y}, {max_y}]",
                    p.y
                )));
            }
            self.shape.set_center(p);
        }
        Ok(())
    }

    /// Runs the controller, the base element update and the y-range clamp, in that order.
    pub fn step(&mut self, rng: &mut rand::rngs::StdRng) -> Result<()> {
        let mut controller = std::mem::replace(&mut self.controller, Box::new(NoopController));
        let outcome = controller.update(self, rng);
        self.controller = controller;
        outcome?;

        Element::update(self);
        self.adjust_position();
        Ok(())
    }
}

impl Element for Paddle {
    fn shape(&self) -> &dyn Shape {
        self.shape.as_ref()
    }

    fn shape_mut(&mut self) -> &mut dyn Shape {
        self.shape.as_mut()
    }

    fn speed(&self) -> Vector2D {
        self.speed
    }

    fn set_speed(&mut self, speed: Vector2D) {
        self.speed = speed;
    }

    fn acceleration(&self) -> Vector2D {
        self.acceleration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::RandomWalkerController;
    use approx::assert_relative_eq;
    use arena_geometry::{Circle, Rectangle};
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_ball_clamps_speed_to_envelope() {
        let mut ball = Ball::new(
            Circle::new(Vector2D::new(0.0, 0.0), 1.0),
            Vector2D::new(10.0, 0.0),
            Vector2D::ZERO,
            (1.0, 5.0),
        )
        .unwrap();
        ball.update();
        assert_relative_eq!(ball.speed().norm(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ball_set_state_rejects_out_of_envelope_speed() {
        let mut ball = Ball::new(
            Circle::new(Vector2D::new(0.0, 0.0), 1.0),
            Vector2D::new(2.0, 0.0),
            Vector2D::ZERO,
            (1.0, 5.0),
        )
        .unwrap();
        assert!(ball
            .set_state(None, Some(Vector2D::new(100.0, 0.0)))
            .is_err());
    }

    #[test]
    fn test_paddle_clamps_to_y_range() {
        let controller = Box::new(RandomWalkerController::new(1.0, [0.0, 0.0, 1.0]).unwrap());
        let shape = Box::new(Rectangle::new(Vector2D::new(0.0, 9.0), 2.0, 2.0, 0.0));
        let mut paddle = Paddle::new(shape, controller, (0.0, 10.0)).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        paddle.step(&mut rng).unwrap();
        assert!(paddle.position().y <= 10.0 + 1e-9);
    }

    #[test]
    fn test_paddle_set_state_rejects_out_of_range_position() {
        let controller = Box::new(RandomWalkerController::new(1.0, [1.0, 0.0, 0.0]).unwrap());
        let shape = Box::new(Rectangle::new(Vector2D::new(0.0, 5.0), 2.0, 2.0, 0.0));
        let mut paddle = Paddle::new(shape, controller, (0.0, 10.0)).unwrap();
        assert!(paddle.set_state(Some(Vector2D::new(0.0, 50.0))).is_err());
    }

    proptest! {
        #[test]
        fn ball_update_keeps_speed_within_envelope(
            angle in 0.0f64..std::f64::consts::TAU,
            magnitude in 0.01f64..50.0,
        ) {
            let initial = Vector2D::new(magnitude * angle.cos(), magnitude * angle.sin());
            let mut ball = Ball::new(
                Circle::new(Vector2D::new(0.0, 0.0), 1.0),
                initial,
                Vector2D::ZERO,
                (1.0, 5.0),
            )
            .unwrap();
            ball.update();
            let norm = ball.speed().norm();
            prop_assert!(norm >= 1.0 - 1e-6 && norm <= 5.0 + 1e-6);
        }

        #[test]
        fn paddle_step_keeps_position_within_y_range(
            start_y in 0.0f64..10.0,
            seed in any::<u64>(),
        ) {
            let controller = Box::new(RandomWalkerController::new(3.0, [0.3, 0.4, 0.3]).unwrap());
            let shape = Box::new(Rectangle::new(Vector2D::new(0.0, start_y), 2.0, 2.0, 0.0));
            let mut paddle = Paddle::new(shape, controller, (0.0, 10.0)).unwrap();
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            for _ in 0..20 {
                paddle.step(&mut rng).unwrap();
                prop_assert!(paddle.position().y >= 0.0 - 1e-9 && paddle.position().y <= 10.0 + 1e-9);
            }
        }
    }
}
