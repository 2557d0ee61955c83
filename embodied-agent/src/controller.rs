//! Paddle motion sources, grounded on `simulation/controllers/*.py` in the
//! original implementation. Each controller owns whatever shared state it
//! reads (a reference element, a network) through `Rc<RefCell<_>>`, the Rust
//! analogue of the original's implicit object aliasing.

use std::cell::RefCell;
use std::rc::Rc;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;

use arena_geometry::Vector2D;
use neural_dynamics::Network;

use crate::element::Element;
use crate::error::{AgentError, Result};

/// A single, minimal contract every paddle motion source implements.
pub trait Controller: std::fmt::Debug {
    fn update(&mut self, controlled: &mut dyn Element, rng: &mut StdRng) -> Result<()>;
}

/// Tracks a reference element's `y` with a PID loop and sets the controlled
/// element's vertical speed accordingly.
#[derive(Debug, Clone)]
pub struct PidController {
    kp: f64,
    ki: f64,
    kd: f64,
    reference: Rc<RefCell<dyn Element>>,
    cumulative_error: f64,
    last_error: Option<f64>,
}

impl PidController {
    pub fn new(kp: f64, ki: f64, kd: f64, reference: Rc<RefCell<dyn Element>>) -> Self {
        Self {
            kp,
            ki,
            kd,
            reference,
            cumulative_error: 0.0,
            last_error: None,
        }
    }
}

impl Controller for PidController {
    fn update(&mut self, controlled: &mut dyn Element, _rng: &mut StdRng) -> Result<()> {
        let error = self.reference.borrow().position().y - controlled.position().y;

        self.cumulative_error += error;
        let differential_error = match self.last_error {
            Some(prev) => error - prev,
            None => 0.0,
        };
        self.last_error = Some(error);

        let correction = self.kp * error + self.ki * self.cumulative_error + self.kd * differential_error;
        controlled.set_speed(Vector2D::new(0.0, correction));
        Ok(())
    }
}

/// Moves the controlled element vertically at a fixed speed based on the
/// average firing of two motor regions read from a shared network.
#[derive(Debug, Clone)]
pub struct ConstantSpeedNetworkController {
    network: Rc<RefCell<Network>>,
    forward_region: String,
    backward_region: String,
    reference_speed: f64,
    signal_threshold: f32,
}

impl ConstantSpeedNetworkController {
    pub fn new(
        network: Rc<RefCell<Network>>,
        forward_region: impl Into<String>,
        backward_region: impl Into<String>,
        reference_speed: f64,
        signal_threshold: f32,
    ) -> Result<Self> {
        let forward_region = forward_region.into();
        let backward_region = backward_region.into();

        network
            .borrow()
            .get_motor_signal(&[forward_region.clone(), backward_region.clone()])
            .map_err(|e| AgentError::ControllerInitialization(e.to_string()))?;

        Ok(Self {
            network,
            forward_region,
            backward_region,
            reference_speed,
            signal_threshold,
        })
    }
}

impl Controller for ConstantSpeedNetworkController {
    fn update(&mut self, controlled: &mut dyn Element, _rng: &mut StdRng) -> Result<()> {
        let signal = self
            .network
            .borrow()
            .get_motor_signal(&[self.forward_region.clone(), self.backward_region.clone()])?;
        let (forward, backward) = (signal[0], signal[1]);

        let mut dy = 0.0;
        if forward >= self.signal_threshold {
            dy += self.reference_speed;
        }
        if backward >= self.signal_threshold {
            dy -= self.reference_speed;
        }
        controlled.set_speed(Vector2D::new(0.0, dy));
        Ok(())
    }
}

/// Baseline controller that steps up, stays or steps down at each tick
/// according to a fixed probability triple, used to compare against the
/// network's learned behavior.
#[derive(Debug, Clone)]
pub struct RandomWalkerController {
    reference_speed: f64,
    probabilities: [f64; 3],
}

impl RandomWalkerController {
    /// `probabilities` is `[p_up, p_stay, p_down]` and must sum to `1.0`.
    pub fn new(reference_speed: f64, probabilities: [f64; 3]) -> Result<Self> {
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(AgentError::ControllerInitialization(format!(
                "random walker probabilities must sum to 1.0, got {sum}"
            )));
        }
        Ok(Self {
            reference_speed,
            probabilities,
        })
    }
}

impl Controller for RandomWalkerController {
    fn update(&mut self, controlled: &mut dyn Element, rng: &mut StdRng) -> Result<()> {
        const MOVEMENTS: [f64; 3] = [1.0, 0.0, -1.0];
        let weights = WeightedIndex::new(self.probabilities).map_err(|e| {
            AgentError::ControllerInitialization(format!("invalid walker weights: {e}"))
        })?;
        let choice = MOVEMENTS[weights.sample(rng)];
        controlled.set_speed(Vector2D::new(0.0, choice * self.reference_speed));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Ball;
    use arena_geometry::Circle;
    use rand::SeedableRng;

    fn ball_at(y: f64) -> Ball {
        Ball::new(
            Circle::new(Vector2D::new(0.0, y), 1.0),
            Vector2D::ZERO,
            Vector2D::ZERO,
            (0.0, 10.0),
        )
        .unwrap()
    }

    #[test]
    fn test_pid_controller_first_tick_has_no_derivative_kick() {
        let reference: Rc<RefCell<dyn Element>> = Rc::new(RefCell::new(ball_at(10.0)));
        let mut pid = PidController::new(1.0, 0.0, 0.0, reference);
        let mut controlled = ball_at(0.0);
        let mut rng = StdRng::seed_from_u64(0);
        pid.update(&mut controlled, &mut rng).unwrap();
        assert_eq!(controlled.speed(), Vector2D::new(0.0, 10.0));
    }

    #[test]
    fn test_random_walker_rejects_bad_probabilities() {
        assert!(RandomWalkerController::new(1.0, [0.5, 0.5, 0.5]).is_err());
    }

    #[test]
    fn test_random_walker_deterministic_with_all_weight_on_up() {
        let mut walker = RandomWalkerController::new(2.0, [1.0, 0.0, 0.0]).unwrap();
        let mut controlled = ball_at(0.0);
        let mut rng = StdRng::seed_from_u64(42);
        walker.update(&mut controlled, &mut rng).unwrap();
        assert_eq!(controlled.speed(), Vector2D::new(0.0, 2.0));
    }
}
