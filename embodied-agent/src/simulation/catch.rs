//! Single-paddle arcade environment, grounded on `simulation/catch.py` in the
//! original implementation. The ball always resets to the same position and
//! trajectory; the agent only has to be in front of it when it arrives.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use arena_geometry::{Circle, Rectangle, Vector2D};
use neural_dynamics::Network;

use crate::config::SimulationConfig;
use crate::controller::Controller;
use crate::element::{Ball, Element, Paddle};
use crate::error::{AgentError, Result};
use crate::results::SuccessRecord;
use crate::translator::SignalTranslator;

/// Catch: a single agent paddle guarding the left wall against a ball
/// launched on a fixed trajectory from the opposite side of the frame.
pub struct CatchSimulation {
    frame_width: f64,
    frame_height: f64,
    frequency: f64,
    ball: Ball,
    agent: Paddle,
    network: Rc<RefCell<Network>>,
    translator: SignalTranslator,
    rng: StdRng,
    ball_initial_position: Vector2D,
    ball_reference_speed: Vector2D,
    agent_initial_position: Vector2D,
    env_history: Vec<(f64, f64)>,
    success_history: Vec<SuccessRecord>,
    tick: u64,
}

impl CatchSimulation {
    pub fn new(
        config: &SimulationConfig,
        network: Rc<RefCell<Network>>,
        agent_controller: Box<dyn Controller>,
        sensory_region_names: Vec<String>,
        neurons_per_sensory_region: usize,
        seed: u64,
    ) -> Result<Self> {
        let half_height = config.frame_height / 2.0;

        let orientation_deg = config.catch_ball_orientation_degrees;
        if !(100.0 < orientation_deg && orientation_deg < 260.0) {
            return Err(AgentError::OutOfBounds(format!(
                "catch ball orientation {orientation_deg} must be strictly between 100 and 260 degrees"
            )));
        }
        let x_speed = config.ball_speed_magnitude;
        let ball_reference_speed = Vector2D::new(
            -x_speed,
            -x_speed * orientation_deg.to_radians().tan(),
        );

        let ball_initial_position = Vector2D::new(config.frame_width - config.paddle_width, half_height);
        let ball = Ball::new(
            Circle::new(ball_initial_position, config.ball_radius),
            ball_reference_speed,
            Vector2D::ZERO,
            config.ball_speed_envelope,
        )?;

        let agent_initial_position = Vector2D::new(config.paddle_width / 2.0, half_height);
        let agent_shape = Box::new(Rectangle::new(
            agent_initial_position,
            config.paddle_width,
            config.paddle_height,
            0.0,
        ));
        let agent = Paddle::new(
            agent_shape,
            agent_controller,
            (config.paddle_height / 2.0, config.frame_height - config.paddle_height / 2.0),
        )?;

        let translator = SignalTranslator::new(
            sensory_region_names,
            neurons_per_sensory_region,
            config.sensor_frequency_envelope,
        );

        Ok(Self {
            frame_width: config.frame_width,
            frame_height: config.frame_height,
            frequency: config.frequency,
            ball,
            agent,
            network,
            translator,
            rng: StdRng::seed_from_u64(seed),
            ball_initial_position,
            ball_reference_speed,
            agent_initial_position,
            env_history: Vec::new(),
            success_history: Vec::new(),
            tick: 0,
        })
    }

    pub fn env_history(&self) -> &[(f64, f64)] {
        &self.env_history
    }

    pub fn success_history(&self) -> &[SuccessRecord] {
        &self.success_history
    }

    pub fn free_energy_history(&self) -> Vec<f64> {
        self.network.borrow().free_energy_history().to_vec()
    }

    /// Average success rate over every rally completed so far.
    pub fn success_rate(&self) -> f64 {
        if self.success_history.is_empty() {
            return 0.0;
        }
        let successes = self.success_history.iter().filter(|r| r.succeeded).count();
        successes as f64 / self.success_history.len() as f64
    }

    pub fn step(&mut self) -> Result<()> {
        self.ball.update();
        self.agent.step(&mut self.rng)?;

        self.check_ball_collisions()?;

        let center = self.ball.position();
        self.env_history.push((center.x, center.y));

        let signal = self.translator.step(
            center.x,
            center.y,
            (self.frame_width, self.frame_height, self.frequency),
        );
        self.network
            .borrow_mut()
            .propagate_signal(&mut self.rng, signal.as_ref())?;
        self.network.borrow_mut().optimize_connections();
        self.network.borrow_mut().compute_free_energy();

        self.tick += 1;
        Ok(())
    }

    fn check_ball_collisions(&mut self) -> Result<()> {
        let center = self.ball.position();
        let ball_radius = match self.ball.shape().as_any().downcast_ref::<Circle>() {
            Some(circle) => circle.radius,
            None => 0.0,
        };

        if center.y <= ball_radius || self.frame_height - center.y <= ball_radius {
            let reflected = self.ball.speed().reflection(Vector2D::new(0.0, 1.0));
            self.ball.set_state(None, Some(reflected))?;
        } else if center.x <= ball_radius {
            self.network.borrow_mut().punish(&mut self.rng)?;
            self.success_history.push(SuccessRecord {
                succeeded: false,
                tick: self.tick,
            });
            self.reset_rally()?;
        } else if self.frame_width - center.x <= ball_radius {
            return Err(AgentError::InvariantViolation(
                "ball reached the right wall, which should never happen in catch".to_string(),
            ));
        } else if self.ball.collides_with(&self.agent) {
            let normal = super::paddle_edge_normal(self.agent.shape(), center)?;
            if normal.approx_eq(Vector2D::new(1.0, 0.0), 1e-9) {
                self.network.borrow_mut().reward(&mut self.rng)?;
                self.success_history.push(SuccessRecord {
                    succeeded: true,
                    tick: self.tick,
                });
                self.reset_rally()?;
            } else {
                let resolved = super::resolve_paddle_collision(self.ball.speed(), self.agent.speed(), normal);
                self.ball.set_state(None, Some(resolved))?;
            }
        }
        Ok(())
    }

    fn reset_rally(&mut self) -> Result<()> {
        self.agent.set_state(Some(self.agent_initial_position))?;
        self.ball
            .set_state(Some(self.ball_initial_position), Some(self.ball_reference_speed))?;
        self.translator.reset_timer();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::RandomWalkerController;
    use neural_dynamics::{NetworkParams, Region, RegionKind};
    use spiking_network::Conformation;

    fn tiny_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.frame_width = 100.0;
        config.frame_height = 60.0;
        config.paddle_width = 10.0;
        config.paddle_height = 20.0;
        config.ball_radius = 2.0;
        config.ball_speed_magnitude = 3.0;
        config.ball_speed_envelope = (1.0, 10.0);
        config.catch_ball_orientation_degrees = 180.0;
        config
    }

    fn tiny_network() -> Rc<RefCell<Network>> {
        let regions = vec![
            Region::new("internal", RegionKind::Internal, 0..2),
            Region::new("sensor_0", RegionKind::External, 2..3),
            Region::new("sensor_1", RegionKind::External, 3..4),
        ];
        let p = nalgebra::DMatrix::from_element(4, 4, 0.1f32);
        let conformation = Conformation::from_edge_probabilities(&p);
        Rc::new(RefCell::new(
            Network::new(regions, conformation, NetworkParams::default()).unwrap(),
        ))
    }

    #[test]
    fn test_rejects_orientation_outside_allowed_range() {
        let mut config = tiny_config();
        config.catch_ball_orientation_degrees = 50.0;
        let network = tiny_network();
        let controller = Box::new(RandomWalkerController::new(1.0, [0.3, 0.4, 0.3]).unwrap());
        let result = CatchSimulation::new(
            &config,
            network,
            controller,
            vec!["sensor_0".to_string(), "sensor_1".to_string()],
            1,
            1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_step_runs_without_error() {
        let config = tiny_config();
        let network = tiny_network();
        let controller = Box::new(RandomWalkerController::new(1.0, [0.3, 0.4, 0.3]).unwrap());
        let mut sim = CatchSimulation::new(
            &config,
            network,
            controller,
            vec!["sensor_0".to_string(), "sensor_1".to_string()],
            1,
            3,
        )
        .unwrap();

        for _ in 0..20 {
            sim.step().unwrap();
        }
        assert_eq!(sim.env_history().len(), 20);
    }
}
