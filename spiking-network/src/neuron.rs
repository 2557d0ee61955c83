//! Stochastic spiking neuron state, grounded on `network/network.py`'s per-neuron
//! state updates in the original implementation (the original represents state as
//! a bare float; here it is a closed enum so illegal states are unrepresentable).

/// The four-phase state of a single neuron.
///
/// `RESTING` and `TRIGGERED` are fixed points (`0.0` and `1.0`); `RECOVERING`
/// carries the partial recovery value `r`, strictly between the two; `DEAD`
/// marks a neuron removed from the simulation (a stable `-1.0` sentinel).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum NeuronState {
    Resting,
    Recovering(f32),
    Triggered,
    Dead,
}

impl NeuronState {
    /// The scalar value used in conformation arithmetic and sensory/motor encoding.
    pub fn value(self) -> f32 {
        match self {
            NeuronState::Resting => 0.0,
            NeuronState::Recovering(r) => r,
            NeuronState::Triggered => 1.0,
            NeuronState::Dead => -1.0,
        }
    }

    pub fn is_triggered(self) -> bool {
        matches!(self, NeuronState::Triggered)
    }

    pub fn is_dead(self) -> bool {
        matches!(self, NeuronState::Dead)
    }

    /// Builds a `Recovering` state, clamping `r` into the open interval `(0, 1)`.
    pub fn recovering(r: f32) -> Self {
        NeuronState::Recovering(r.clamp(f32::EPSILON, 1.0 - f32::EPSILON))
    }
}

impl Default for NeuronState {
    fn default() -> Self {
        NeuronState::Resting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values() {
        assert_eq!(NeuronState::Resting.value(), 0.0);
        assert_eq!(NeuronState::Triggered.value(), 1.0);
        assert_eq!(NeuronState::Dead.value(), -1.0);
        assert_eq!(NeuronState::recovering(0.5).value(), 0.5);
    }

    #[test]
    fn test_recovering_clamped() {
        assert!(NeuronState::recovering(1.5).value() < 1.0);
        assert!(NeuronState::recovering(-1.0).value() > 0.0);
    }

    #[test]
    fn test_predicates() {
        assert!(NeuronState::Triggered.is_triggered());
        assert!(!NeuronState::Resting.is_triggered());
        assert!(NeuronState::Dead.is_dead());
    }
}
