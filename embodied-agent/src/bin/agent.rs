//! Command-line entry point: builds a network and an arcade simulation from
//! flags, runs the requested number of episodes and writes results to disk.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use tracing::info;

use embodied_agent::config::{NetworkTopology, RunConfig, SimulationKind};
use embodied_agent::controller::{ConstantSpeedNetworkController, Controller, RandomWalkerController};
use embodied_agent::results::{JsonResultWriter, ResultWriter, RunResults, SuccessRecord};
use embodied_agent::simulation::{catch::CatchSimulation, pong::PongSimulation};

#[derive(Parser, Debug)]
#[command(name = "agent")]
#[command(about = "Runs a spiking-network agent embodied in a Pong or Catch arena")]
struct Cli {
    /// Which arcade environment to embody the agent in.
    #[arg(long, default_value = "pong")]
    simulation: SimulationKind,

    /// Run every episode back to back without interactive output.
    #[arg(long)]
    batch: bool,

    /// Overrides the plasticity coefficients: decay, exploration, strengthening.
    #[arg(long, num_args = 3, value_names = ["DECAY", "EXPLORATION", "STRENGTHENING"])]
    coef: Option<Vec<f32>>,

    /// Drives the agent paddle with a random walker instead of the network.
    #[arg(long)]
    random: bool,

    /// Seed for every random number generator used in the run.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of episodes to run.
    #[arg(long, default_value_t = 100)]
    episodes: usize,

    /// Directory results are written under.
    #[arg(long, default_value = "results")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = RunConfig {
        seed: cli.seed,
        episodes: cli.episodes,
        simulation_kind: cli.simulation,
        ..RunConfig::default()
    };

    if let Some(coef) = &cli.coef {
        config.network.decay_coefficient = coef[0];
        config.network.exploration_rate = coef[1];
        config.network.strengthening_exponent = coef[2];
    }

    info!(simulation = ?config.simulation_kind, episodes = config.episodes, "starting run");

    let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
    let network = config
        .topology
        .build_network(config.network.clone(), &mut rng)
        .context("failed to build network")?;
    let network = Rc::new(RefCell::new(network));

    let agent_controller: Box<dyn Controller> = if cli.random {
        Box::new(RandomWalkerController::new(config.simulation.agent_speed, [0.3, 0.4, 0.3])?)
    } else {
        Box::new(ConstantSpeedNetworkController::new(
            Rc::clone(&network),
            NetworkTopology::FORWARD_MOTOR_REGION,
            NetworkTopology::BACKWARD_MOTOR_REGION,
            config.simulation.agent_speed,
            config.simulation.controller_threshold,
        )?)
    };

    let sensor_names = config.topology.sensor_region_names();
    let neurons_per_sensor = config.topology.neurons_per_sensor_region;

    std::fs::create_dir_all(&cli.out).context("failed to create results directory")?;
    let writer = JsonResultWriter::new(&cli.out);

    match config.simulation_kind {
        SimulationKind::Pong => {
            let mut simulation = PongSimulation::new(
                &config.simulation,
                network,
                agent_controller,
                sensor_names,
                neurons_per_sensor,
                config.seed,
            )
            .context("failed to construct pong simulation")?;

            for episode in 0..config.episodes {
                simulation.step().context("pong simulation step failed")?;
                if !cli.batch {
                    info!(episode, "tick complete");
                }
            }

            let free_energy_history = simulation.free_energy_history();
            let success_history: Vec<SuccessRecord> = Vec::new();
            let results = RunResults {
                env_history: simulation.env_history(),
                free_energy_history: &free_energy_history,
                success_history: &success_history,
                config: &config,
            };
            writer.write("pong", &results)?;
        }
        SimulationKind::Catch => {
            let mut simulation = CatchSimulation::new(
                &config.simulation,
                network,
                agent_controller,
                sensor_names,
                neurons_per_sensor,
                config.seed,
            )
            .context("failed to construct catch simulation")?;

            for episode in 0..config.episodes {
                simulation.step().context("catch simulation step failed")?;
                if !cli.batch {
                    info!(episode, success_rate = simulation.success_rate(), "tick complete");
                }
            }

            let free_energy_history = simulation.free_energy_history();
            let results = RunResults {
                env_history: simulation.env_history(),
                free_energy_history: &free_energy_history,
                success_history: simulation.success_history(),
                config: &config,
            };
            writer.write("catch", &results)?;
        }
    }

    info!(out = %cli.out.display(), "run complete");
    Ok(())
}
