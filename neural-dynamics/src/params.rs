//! Tunable network parameters, with the documented defaults from the original
//! implementation's `network/network.py` constructor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub recovery_state_energy_ratio: f32,
    pub state_history_size: usize,
    pub decay_coefficient: f32,
    pub exploration_rate: f32,
    pub strengthening_exponent: f32,
    pub reward_fn_period: usize,
    pub reward_fn_signal_period: usize,
    pub punish_fn_period: usize,
    pub punish_fn_min_signal_period: usize,
    pub punish_fn_max_signal_period: usize,
    pub k_value: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            recovery_state_energy_ratio: 0.5,
            state_history_size: 12,
            decay_coefficient: 0.01875,
            exploration_rate: 0.0003,
            strengthening_exponent: 1.009,
            reward_fn_period: 12,
            reward_fn_signal_period: 4,
            punish_fn_period: 48,
            punish_fn_min_signal_period: 4,
            punish_fn_max_signal_period: 8,
            k_value: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_json() {
        let params = NetworkParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let restored: NetworkParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, restored);
    }
}
