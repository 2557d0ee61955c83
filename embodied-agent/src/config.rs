//! Construction-time configuration, round-trippable to `config.json` per run.

use serde::{Deserialize, Serialize};

use neural_dynamics::{Network, NetworkParams};
use spiking_network::{graph_generation, Conformation, Region, RegionKind};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationKind {
    Pong,
    Catch,
}

impl std::str::FromStr for SimulationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pong" => Ok(SimulationKind::Pong),
            "catch" => Ok(SimulationKind::Catch),
            other => Err(format!("unknown simulation kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub frame_width: f64,
    pub frame_height: f64,
    pub frequency: f64,
    pub sensor_frequency_envelope: (f64, f64),
    pub agent_speed: f64,
    pub controller_threshold: f32,
    pub ball_radius: f64,
    pub ball_speed_envelope: (f64, f64),
    pub ball_speed_magnitude: f64,
    pub paddle_width: f64,
    pub paddle_height: f64,
    /// `(kp, ki, kd)` gains for the Pong opposing paddle's PID controller.
    pub opponent_pid_gains: (f64, f64, f64),
    /// Half-width/half-height of the rectangle the Pong ball is regenerated
    /// within, centered on the field.
    pub ball_generation_half_extent: (f64, f64),
    /// `(min, max)` degrees for the Pong ball's regeneration orientation.
    pub ball_orientation_range_degrees: (f64, f64),
    /// Degrees in `(100, 260)` for the Catch ball's fixed reset orientation.
    pub catch_ball_orientation_degrees: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_width: 400.0,
            frame_height: 300.0,
            frequency: 60.0,
            sensor_frequency_envelope: (2.0, 30.0),
            agent_speed: 4.0,
            controller_threshold: 0.5,
            ball_radius: 5.0,
            ball_speed_envelope: (2.0, 10.0),
            ball_speed_magnitude: 5.0,
            paddle_width: 10.0,
            paddle_height: 60.0,
            opponent_pid_gains: (0.5, 0.0, 0.0),
            ball_generation_half_extent: (50.0, 75.0),
            ball_orientation_range_degrees: (120.0, 240.0),
            catch_ball_orientation_degrees: 180.0,
        }
    }
}

/// Sizes the network topology a run constructs: one internal region, a set
/// of named sensory regions tiling the ball's vertical range, and two named
/// motor regions (forward/backward) the agent's controller reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkTopology {
    pub internal_neuron_count: usize,
    pub sensor_region_count: usize,
    pub neurons_per_sensor_region: usize,
    pub neurons_per_motor_region: usize,
    pub transmission_average: f32,
}

impl Default for NetworkTopology {
    fn default() -> Self {
        Self {
            internal_neuron_count: 64,
            sensor_region_count: 4,
            neurons_per_sensor_region: 4,
            neurons_per_motor_region: 4,
            transmission_average: 0.1,
        }
    }
}

impl NetworkTopology {
    pub fn sensor_region_names(&self) -> Vec<String> {
        (0..self.sensor_region_count)
            .map(|i| format!("sensor_{i}"))
            .collect()
    }

    pub const FORWARD_MOTOR_REGION: &'static str = "motor_forward";
    pub const BACKWARD_MOTOR_REGION: &'static str = "motor_backward";

    /// Assembles the regions and a freshly-sampled connectivity matrix into a
    /// network: the internal pool and the two motor read-out regions (both
    /// `Internal`, so they stay part of recurrent plasticity and are only
    /// ever read through [`neural_dynamics::Network::get_motor_signal`], never
    /// externally clamped), followed by the externally-clamped sensory
    /// regions, matching the internal-before-external ordering
    /// [`neural_dynamics::Network::new`] requires.
    pub fn build_network(&self, params: NetworkParams, rng: &mut impl rand::Rng) -> Result<Network> {
        let mut regions = Vec::new();
        let mut cursor = 0usize;

        regions.push(Region::new(
            "internal",
            RegionKind::Internal,
            cursor..cursor + self.internal_neuron_count,
        ));
        cursor += self.internal_neuron_count;

        for name in [Self::FORWARD_MOTOR_REGION, Self::BACKWARD_MOTOR_REGION] {
            regions.push(Region::new(
                name,
                RegionKind::Internal,
                cursor..cursor + self.neurons_per_motor_region,
            ));
            cursor += self.neurons_per_motor_region;
        }

        for name in self.sensor_region_names() {
            regions.push(Region::new(
                name,
                RegionKind::External,
                cursor..cursor + self.neurons_per_sensor_region,
            ));
            cursor += self.neurons_per_sensor_region;
        }

        let probabilities = graph_generation::self_referring_fixed_average_transmission(
            cursor,
            self.transmission_average,
            rng,
        )
        .map_err(neural_dynamics::NeuralDynamicsError::Initialization)?;
        let conformation = Conformation::from_edge_probabilities(&probabilities);

        Ok(Network::new(regions, conformation, params)?)
    }
}

/// Aggregates every tunable surface exposed to the CLI: network plasticity
/// constants, topology, arena geometry/timing, and the run's episode count
/// and simulation variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub network: NetworkParams,
    pub topology: NetworkTopology,
    pub simulation: SimulationConfig,
    pub episodes: usize,
    pub seed: u64,
    pub simulation_kind: SimulationKind,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            network: NetworkParams::default(),
            topology: NetworkTopology::default(),
            simulation: SimulationConfig::default(),
            episodes: 100,
            seed: 0,
            simulation_kind: SimulationKind::Pong,
        }
    }
}
