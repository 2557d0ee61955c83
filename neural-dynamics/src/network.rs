//! The recurrent stochastic spiking network: propagation, plasticity, reward/punish
//! replay and free-energy accounting. Grounded on `network/network.py` in the
//! original implementation; built atop the `spiking-network` crate's neuron,
//! region and conformation primitives.

use std::collections::{HashMap, HashSet, VecDeque};

use rand::Rng;
use spiking_network::{validate_regions, Conformation, NeuronState, Region, RegionKind};

use crate::error::{NeuralDynamicsError, Result};
use crate::params::NetworkParams;

/// A mapping from external region name to the full replacement state for that
/// region, used both for direct sensory clamping and for the reward/punish
/// replay routines.
pub type SensorySignal = HashMap<String, Vec<NeuronState>>;

pub struct Network {
    regions: Vec<Region>,
    states: Vec<NeuronState>,
    conformation: Conformation,
    state_history: VecDeque<Vec<NeuronState>>,
    free_energy_history: Vec<f64>,
    params: NetworkParams,
    internal_size: usize,
}

impl Network {
    /// Builds a network from its regions and connection matrix. Region names
    /// must be unique and their index ranges must tile `[0, conformation.size())`
    /// exactly, with every internal region preceding every external region
    /// (the ordering convention the internal-submatrix restriction relies on).
    pub fn new(
        regions: Vec<Region>,
        conformation: Conformation,
        params: NetworkParams,
    ) -> Result<Self> {
        validate_regions(&regions, conformation.size())?;

        let mut seen_external = false;
        for region in &regions {
            if region.is_internal() && seen_external {
                return Err(NeuralDynamicsError::Initialization(
                    spiking_network::SpikingNetworkError::NetworkInitialization(
                        "internal regions must be assembled before external regions".to_string(),
                    ),
                ));
            }
            if !region.is_internal() {
                seen_external = true;
            }
        }

        let internal_size = regions
            .iter()
            .filter(|r| r.is_internal())
            .map(|r| r.size())
            .sum();

        tracing::debug!(
            neuron_count = conformation.size(),
            internal_size,
            region_count = regions.len(),
            "assembling network"
        );

        let n = conformation.size();
        let initial_state = vec![NeuronState::Resting; n];
        let mut state_history = VecDeque::with_capacity(params.state_history_size);
        for _ in 0..params.state_history_size {
            state_history.push_back(initial_state.clone());
        }

        Ok(Self {
            regions,
            states: initial_state,
            conformation,
            state_history,
            free_energy_history: Vec::new(),
            params,
            internal_size,
        })
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    pub fn size(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &[NeuronState] {
        &self.states
    }

    pub fn free_energy_history(&self) -> &[f64] {
        &self.free_energy_history
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name() == name)
    }

    fn region_mut(&mut self, name: &str) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.name() == name)
    }

    /// Names of every external (sensor-clamped) region, in assembly order.
    pub fn sensory_region_names(&self) -> Vec<String> {
        self.regions
            .iter()
            .filter(|r| r.kind() == RegionKind::External)
            .map(|r| r.name().to_string())
            .collect()
    }

    /// Directly replaces a region's state vector. Fails if the region does
    /// not exist or the vector's length does not match the region's size.
    pub fn set_region_state(&mut self, name: &str, values: Vec<NeuronState>) -> Result<()> {
        let region = self
            .regions
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| NeuralDynamicsError::Communication(vec![name.to_string()]))?;
        if values.len() != region.size() {
            return Err(NeuralDynamicsError::Communication(vec![name.to_string()]));
        }
        let range = region.index_range();
        self.states[range].copy_from_slice(&values);
        Ok(())
    }

    fn validate_signal(&self, signal: &SensorySignal) -> Result<()> {
        let mut faulty = Vec::new();
        for (name, values) in signal {
            match self.region(name) {
                None => faulty.push(name.clone()),
                Some(region) if region.size() != values.len() => faulty.push(name.clone()),
                _ => {}
            }
        }
        if faulty.is_empty() {
            Ok(())
        } else {
            Err(NeuralDynamicsError::Communication(faulty))
        }
    }

    /// Per-target non-firing probability `nf[i] = exp(sum over triggered j of ln C[i,j])`,
    /// with non-edges treated as contributing `ln(1) = 0`.
    fn non_firing(&self, triggered: &[bool]) -> Vec<f32> {
        let n = self.conformation.size();
        (0..n)
            .map(|i| {
                let log_nf: f32 = (0..n)
                    .filter(|&j| triggered[j])
                    .map(|j| {
                        if self.conformation.has_edge(i, j) {
                            self.conformation.get(i, j).max(f32::MIN_POSITIVE).ln()
                        } else {
                            0.0
                        }
                    })
                    .sum();
                log_nf.exp()
            })
            .collect()
    }

    /// Advances the network by one tick: clamps named external regions to the
    /// provided values, computes each neuron's firing probability from the
    /// current triggered set, and updates every non-clamped neuron's state.
    pub fn propagate_signal(
        &mut self,
        rng: &mut impl Rng,
        sensory_signal: Option<&SensorySignal>,
    ) -> Result<()> {
        let empty = HashMap::new();
        let signal = sensory_signal.unwrap_or(&empty);
        self.validate_signal(signal)?;

        for (name, values) in signal {
            self.set_region_state(name, values.clone())?;
        }

        let clamped: HashSet<&str> = signal.keys().map(String::as_str).collect();
        let triggered: Vec<bool> = self.states.iter().map(|s| s.is_triggered()).collect();
        let p_fire = self.non_firing(&triggered)
            .into_iter()
            .map(|nf| 1.0 - nf)
            .collect::<Vec<f32>>();

        let mut new_states = self.states.clone();
        for region in &self.regions {
            if clamped.contains(region.name()) {
                continue;
            }
            for i in region.index_range() {
                new_states[i] = match self.states[i] {
                    NeuronState::Dead => NeuronState::Dead,
                    NeuronState::Triggered => {
                        NeuronState::recovering(self.params.recovery_state_energy_ratio)
                    }
                    NeuronState::Recovering(_) => {
                        if rng.gen::<f32>() <= p_fire[i] {
                            NeuronState::recovering(self.params.recovery_state_energy_ratio)
                        } else {
                            NeuronState::Resting
                        }
                    }
                    NeuronState::Resting => {
                        if rng.gen::<f32>() <= p_fire[i] {
                            NeuronState::Triggered
                        } else {
                            NeuronState::Resting
                        }
                    }
                };
            }
        }
        self.states = new_states;

        if self.state_history.len() == self.params.state_history_size {
            self.state_history.pop_front();
        }
        self.state_history.push_back(self.states.clone());

        Ok(())
    }

    /// Decays the internal conformation toward `1.0`, then applies exploratory
    /// weakening and Hebbian strengthening around neurons that just triggered.
    /// Decay is restricted to the internal x internal block; sensory edges are
    /// left untouched, matching `get_internal_conformation`/`_conformation[ix_(internal,internal)]`
    /// in the original.
    pub fn optimize_connections(&mut self) {
        self.conformation
            .decay_block(self.internal_size, self.params.decay_coefficient);

        let mut internal = self.conformation.internal_submatrix(self.internal_size);
        let current = &self.states[0..self.internal_size];
        let previous_snapshot = &self.state_history[self.state_history.len() - 2];
        let previous = &previous_snapshot[0..self.internal_size];

        for i in 0..self.internal_size {
            if !current[i].is_triggered() {
                continue;
            }
            for j in 0..self.internal_size {
                if !self.conformation.has_edge(j, i) {
                    continue;
                }
                internal[(j, i)] = (internal[(j, i)] * (1.0 - self.params.exploration_rate))
                    .clamp(0.0, 1.0);
            }
            for j in 0..self.internal_size {
                if previous[j].is_triggered() && self.conformation.has_edge(i, j) {
                    internal[(i, j)] =
                        internal[(i, j)].powf(self.params.strengthening_exponent).clamp(0.0, 1.0);
                }
            }
        }

        self.conformation.set_internal_submatrix(&internal);
    }

    /// Returns a scalar per named region: the average, over the last `H` state
    /// snapshots, of that region's mean state value.
    pub fn get_motor_signal(&self, region_names: &[String]) -> Result<Vec<f32>> {
        let mut out = Vec::with_capacity(region_names.len());
        for name in region_names {
            let region = self
                .region(name)
                .ok_or_else(|| NeuralDynamicsError::Communication(vec![name.clone()]))?;
            let range = region.index_range();
            let sum: f32 = self
                .state_history
                .iter()
                .map(|snapshot| {
                    let values = &snapshot[range.clone()];
                    values.iter().map(|s| s.value()).sum::<f32>() / values.len() as f32
                })
                .sum();
            out.push(sum / self.state_history.len() as f32);
        }
        Ok(out)
    }

    /// Scalar free-energy observable: potential energy from triggered internal
    /// neurons, minus `k` times the binary entropy summed over non-triggered
    /// neurons network-wide. Uses the full conformation matrix, not the
    /// internal submatrix, matching the original implementation.
    pub fn compute_free_energy(&mut self) -> f64 {
        let n = self.conformation.size();
        let triggered: Vec<bool> = self.states.iter().map(|s| s.is_triggered()).collect();
        let p_rest = self.non_firing(&triggered);

        let mut entropy_sum = 0.0f64;
        for i in 0..n {
            if triggered[i] {
                continue;
            }
            let p_rest_i = (p_rest[i] as f64).clamp(f64::MIN_POSITIVE, 1.0);
            let p_fire_i = (1.0 - p_rest[i] as f64).clamp(f64::MIN_POSITIVE, 1.0);
            entropy_sum += -p_rest_i * p_rest_i.log2() - p_fire_i * p_fire_i.log2();
        }

        let potential_energy = -(self.states[0..self.internal_size]
            .iter()
            .filter(|s| s.is_triggered())
            .count() as f64);

        let free_energy = potential_energy - self.params.k_value * entropy_sum;
        self.free_energy_history.push(free_energy);
        free_energy
    }

    /// Replays a coherent, periodic pattern through every sensory region for
    /// `reward_fn_period` ticks, running propagation and plasticity each tick.
    pub fn reward(&mut self, rng: &mut impl Rng) -> Result<()> {
        let sensory_names = self.sensory_region_names();
        for t in 0..self.params.reward_fn_period {
            let fire = t % self.params.reward_fn_signal_period == 0;
            let signal = self.build_signal(&sensory_names, |_| fire);
            self.propagate_signal(rng, Some(&signal))?;
            self.optimize_connections();
        }
        Ok(())
    }

    /// Replays an incoherent, per-region-randomized pattern through every
    /// sensory region for `punish_fn_period` ticks, to dissipate recently
    /// formed associations.
    pub fn punish(&mut self, rng: &mut impl Rng) -> Result<()> {
        let sensory_names = self.sensory_region_names();
        let periods_and_delays: Vec<(i64, i64)> = sensory_names
            .iter()
            .map(|_| {
                let period = rng.gen_range(
                    self.params.punish_fn_min_signal_period as i64
                        ..self.params.punish_fn_max_signal_period as i64,
                );
                let delay = rng.gen_range(0..(self.params.punish_fn_period as i64 / 2).max(1));
                (period, delay)
            })
            .collect();

        for t in 0..self.params.punish_fn_period {
            let t = t as i64;
            let signal = self.build_signal(&sensory_names, |idx| {
                let (period, delay) = periods_and_delays[idx];
                t >= delay && (t - delay) % period == 0
            });
            self.propagate_signal(rng, Some(&signal))?;
            self.optimize_connections();
        }
        Ok(())
    }

    fn build_signal(&self, names: &[String], fire: impl Fn(usize) -> bool) -> SensorySignal {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let size = self.region(name).map(|r| r.size()).unwrap_or(0);
                let value = if fire(idx) {
                    NeuronState::Triggered
                } else {
                    NeuronState::Resting
                };
                (name.clone(), vec![value; size])
            })
            .collect()
    }

    /// Marks `k` uniformly-sampled neurons in region `name` as `Dead`. Fails
    /// if `k` is at least the region's size, matching the original's
    /// rejection of `number_neurons >= region.size`.
    pub fn remove_neurons(&mut self, k: usize, name: &str, rng: &mut impl Rng) -> Result<()> {
        let range = self
            .region_mut(name)
            .ok_or_else(|| NeuralDynamicsError::Communication(vec![name.to_string()]))?
            .index_range();

        let mut candidates: Vec<usize> = range.collect();
        if k >= candidates.len() {
            return Err(NeuralDynamicsError::Communication(vec![name.to_string()]));
        }
        for i in 0..k {
            let j = rng.gen_range(i..candidates.len());
            candidates.swap(i, j);
            self.states[candidates[i]] = NeuronState::Dead;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use proptest::prelude::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;

    fn tiny_network() -> Network {
        let regions = vec![
            Region::new("i0", RegionKind::Internal, 0..2),
            Region::new("e0", RegionKind::External, 2..3),
        ];
        let p = DMatrix::from_row_slice(3, 3, &[f32::NAN, 0.2, 0.2, 0.2, f32::NAN, 0.2, 0.2, 0.2, f32::NAN]);
        let conformation = Conformation::from_edge_probabilities(&p);
        Network::new(regions, conformation, NetworkParams::default()).unwrap()
    }

    #[test]
    fn test_construction_fixes_history_length() {
        let net = tiny_network();
        assert_eq!(net.state_history.len(), net.params.state_history_size);
    }

    #[test]
    fn test_set_region_state_rejects_unknown_region() {
        let mut net = tiny_network();
        assert!(net
            .set_region_state("nope", vec![NeuronState::Resting])
            .is_err());
    }

    #[test]
    fn test_propagate_signal_clamps_named_region() {
        let mut net = tiny_network();
        let mut rng = StepRng::new(0, 1);
        let mut signal = SensorySignal::new();
        signal.insert("e0".to_string(), vec![NeuronState::Triggered]);
        net.propagate_signal(&mut rng, Some(&signal)).unwrap();
        assert_eq!(net.states()[2], NeuronState::Triggered);
    }

    #[test]
    fn test_propagate_signal_rejects_unknown_region_name() {
        let mut net = tiny_network();
        let mut rng = StepRng::new(0, 1);
        let mut signal = SensorySignal::new();
        signal.insert("ghost".to_string(), vec![NeuronState::Triggered]);
        assert!(net.propagate_signal(&mut rng, Some(&signal)).is_err());
    }

    #[test]
    fn test_dead_neurons_never_change() {
        let mut net = tiny_network();
        let mut rng = StepRng::new(u64::MAX / 2, 1);
        net.states[0] = NeuronState::Dead;
        net.propagate_signal(&mut rng, None).unwrap();
        assert_eq!(net.states()[0], NeuronState::Dead);
    }

    #[test]
    fn test_remove_neurons_marks_exactly_k_dead() {
        let regions = vec![Region::new("i0", RegionKind::Internal, 0..5)];
        let p = DMatrix::from_element(5, 5, 0.2);
        let conformation = Conformation::from_edge_probabilities(&p);
        let mut net = Network::new(regions, conformation, NetworkParams::default()).unwrap();
        let mut rng = rand::rngs::mock::StepRng::new(7, 3);
        net.remove_neurons(2, "i0", &mut rng).unwrap();
        let dead_count = net.states().iter().filter(|s| s.is_dead()).count();
        assert_eq!(dead_count, 2);
    }

    #[test]
    fn test_remove_neurons_rejects_k_at_least_region_size() {
        let regions = vec![Region::new("i0", RegionKind::Internal, 0..5)];
        let p = DMatrix::from_element(5, 5, 0.2);
        let conformation = Conformation::from_edge_probabilities(&p);
        let mut net = Network::new(regions, conformation, NetworkParams::default()).unwrap();
        let mut rng = StepRng::new(7, 3);
        assert!(net.remove_neurons(5, "i0", &mut rng).is_err());
        assert!(net.states().iter().all(|s| !s.is_dead()));
    }

    #[test]
    fn test_free_energy_all_resting_zero_conformation() {
        let regions = vec![Region::new("i0", RegionKind::Internal, 0..2)];
        let p = DMatrix::from_element(2, 2, 1.0f32);
        let conformation = Conformation::from_edge_probabilities(&p);
        let mut net = Network::new(regions, conformation, NetworkParams::default()).unwrap();
        let f = net.compute_free_energy();
        assert_relative_eq!(f, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_get_motor_signal_identically_one_region() {
        let mut net = tiny_network();
        for snapshot in net.state_history.iter_mut() {
            snapshot[2] = NeuronState::Triggered;
        }
        net.states[2] = NeuronState::Triggered;
        let signal = net.get_motor_signal(&["e0".to_string()]).unwrap();
        assert_relative_eq!(signal[0], 1.0, epsilon = 1e-6);
    }

    proptest! {
        #[test]
        fn state_history_length_stays_bounded_across_arbitrary_ticks(
            history_size in 1usize..20,
            ticks in 0usize..40,
            seed in any::<u64>(),
        ) {
            let regions = vec![
                Region::new("i0", RegionKind::Internal, 0..2),
                Region::new("e0", RegionKind::External, 2..3),
            ];
            let p = DMatrix::from_row_slice(
                3,
                3,
                &[f32::NAN, 0.2, 0.2, 0.2, f32::NAN, 0.2, 0.2, 0.2, f32::NAN],
            );
            let conformation = Conformation::from_edge_probabilities(&p);
            let params = NetworkParams {
                state_history_size: history_size,
                ..NetworkParams::default()
            };
            let mut net = Network::new(regions, conformation, params).unwrap();
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            for _ in 0..ticks {
                net.propagate_signal(&mut rng, None).unwrap();
                prop_assert_eq!(net.state_history.len(), history_size);
            }
        }
    }
}
