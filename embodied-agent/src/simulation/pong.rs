//! Two-paddle arcade environment, grounded on `simulation/pong.py` in the
//! original implementation. The agent paddle guards the left wall; a
//! PID-controlled opponent guards the right wall. Passing the opponent's
//! wall rewards the agent, passing the agent's own wall punishes it.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use arena_geometry::{Circle, Rectangle, Vector2D};
use neural_dynamics::Network;

use crate::config::SimulationConfig;
use crate::controller::{Controller, PidController};
use crate::element::{Ball, Element, Paddle};
use crate::error::Result;
use crate::translator::SignalTranslator;

/// Pong: an agent paddle and a PID-controlled opponent paddle on opposite
/// walls, volleying a single ball.
pub struct PongSimulation {
    frame_width: f64,
    frame_height: f64,
    frequency: f64,
    ball: Ball,
    opponent: Paddle,
    agent: Paddle,
    network: Rc<RefCell<Network>>,
    translator: SignalTranslator,
    rng: StdRng,
    ball_reference_speed: f64,
    ball_orientation_range: (f64, f64),
    ball_generation_half_extent: (f64, f64),
    env_history: Vec<(f64, f64)>,
    tick: u64,
}

impl PongSimulation {
    pub fn new(
        config: &SimulationConfig,
        network: Rc<RefCell<Network>>,
        agent_controller: Box<dyn Controller>,
        sensory_region_names: Vec<String>,
        neurons_per_sensory_region: usize,
        seed: u64,
    ) -> Result<Self> {
        let half_width = config.frame_width / 2.0;
        let half_height = config.frame_height / 2.0;

        let ball_speed = Vector2D::new(-config.ball_speed_magnitude, 0.0);
        let ball = Ball::new(
            Circle::new(Vector2D::new(half_width, half_height), config.ball_radius),
            ball_speed,
            Vector2D::ZERO,
            config.ball_speed_envelope,
        )?;

        let opponent_shape = Box::new(Rectangle::new(
            Vector2D::new(config.frame_width - config.paddle_width / 2.0, half_height),
            config.paddle_width,
            config.paddle_height,
            0.0,
        ));
        let opponent_reference = Rc::new(RefCell::new(ball.clone())) as Rc<RefCell<dyn Element>>;
        let (kp, ki, kd) = config.opponent_pid_gains;
        let opponent_controller = Box::new(PidController::new(kp, ki, kd, opponent_reference));
        let opponent = Paddle::new(
            opponent_shape,
            opponent_controller,
            (config.paddle_height / 2.0, config.frame_height - config.paddle_height / 2.0),
        )?;

        let agent_shape = Box::new(Rectangle::new(
            Vector2D::new(config.paddle_width / 2.0, half_height),
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
            ball_reference_speed: ball_speed.norm(),
            ball_orientation_range: config.ball_orientation_range_degrees,
            ball_generation_half_extent: config.ball_generation_half_extent,
            ball,
            opponent,
            agent,
            network,
            translator,
            rng: StdRng::seed_from_u64(seed),
            env_history: Vec::new(),
            tick: 0,
        })
    }

    pub fn env_history(&self) -> &[(f64, f64)] {
        &self.env_history
    }

    pub fn free_energy_history(&self) -> Vec<f64> {
        self.network.borrow().free_energy_history().to_vec()
    }

    /// Advances every element, resolves ball collisions, drives the sensory
    /// signal into the network and runs one round of plasticity.
    pub fn step(&mut self) -> Result<()> {
        self.ball.update();
        self.opponent.step(&mut self.rng)?;
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
            self.regenerate_ball()?;
            self.translator.reset_timer();
        } else if self.frame_width - center.x <= ball_radius {
            self.network.borrow_mut().reward(&mut self.rng)?;
            self.regenerate_ball()?;
            self.translator.reset_timer();
        } else if self.ball.collides_with(&self.opponent) {
            let normal = super::paddle_edge_normal(self.opponent.shape(), center)?;
            let resolved = super::resolve_paddle_collision(self.ball.speed(), self.opponent.speed(), normal);
            self.ball.set_state(None, Some(resolved))?;
        } else if self.ball.collides_with(&self.agent) {
            self.network.borrow_mut().reward(&mut self.rng)?;
            let normal = super::paddle_edge_normal(self.agent.shape(), center)?;
            let resolved = super::resolve_paddle_collision(self.ball.speed(), self.agent.speed(), normal);
            self.ball.set_state(None, Some(resolved))?;
        }
        Ok(())
    }

    fn regenerate_ball(&mut self) -> Result<()> {
        let (half_x, half_y) = self.ball_generation_half_extent;
        let center_x = self.frame_width / 2.0 + self.rng.gen_range(-half_x..=half_x);
        let center_y = self.frame_height / 2.0 + self.rng.gen_range(-half_y..=half_y);

        let (min_deg, max_deg) = self.ball_orientation_range;
        let orientation = self.rng.gen_range(min_deg..max_deg);
        let speed = Vector2D::new(self.ball_reference_speed, 0.0).rotate(orientation);

        self.ball
            .set_state(Some(Vector2D::new(center_x, center_y)), Some(speed))
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
        config.ball_speed_magnitude = 4.0;
        config.ball_speed_envelope = (1.0, 10.0);
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
    fn test_step_runs_without_error_and_records_history() {
        let config = tiny_config();
        let network = tiny_network();
        let controller = Box::new(RandomWalkerController::new(1.0, [0.3, 0.4, 0.3]).unwrap());
        let mut sim = PongSimulation::new(
            &config,
            network,
            controller,
            vec!["sensor_0".to_string(), "sensor_1".to_string()],
            1,
            7,
        )
        .unwrap();

        for _ in 0..20 {
            sim.step().unwrap();
        }
        assert_eq!(sim.env_history().len(), 20);
    }
}
