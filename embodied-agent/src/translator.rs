//! Translates ball position into a topographically-clamped sensory signal,
//! grounded on `simulation/translators/pong_translators.py`'s `PongSignalTranslator`
//! and `CatchSignalTranslator` in the original implementation (unified here into a
//! single translator, since the two only differed in class name).
//!
//! Per the original's aliasing of `self.simulation`, this translator does not hold
//! a back-reference to the simulation driving it; the caller supplies the ball
//! position and frame parameters at each tick instead.

use neural_dynamics::NeuronState;

pub type SensorySignal = neural_dynamics::SensorySignal;

/// Encodes a ball's `(x, y)` position into a one-hot signal across named,
/// vertically-stacked sensory regions, firing at a frequency that rises as
/// the ball approaches the agent's side of the arena.
#[derive(Debug, Clone)]
pub struct SignalTranslator {
    region_names: Vec<String>,
    neurons_per_region: usize,
    frequency_envelope: (f64, f64),
    counter: i64,
}

impl SignalTranslator {
    pub fn new(
        region_names: Vec<String>,
        neurons_per_region: usize,
        frequency_envelope: (f64, f64),
    ) -> Self {
        Self {
            region_names,
            neurons_per_region,
            frequency_envelope,
            counter: -1,
        }
    }

    /// Resets the firing timer, used on ball regeneration.
    pub fn reset_timer(&mut self) {
        self.counter = -1;
    }

    /// Advances the translator by one tick. Returns `Some(signal)` on ticks
    /// where the encoded region fires, `None` otherwise (the network keeps
    /// running without re-clamping the sensory regions).
    pub fn step(&mut self, ball_x: f64, ball_y: f64, frame: (f64, f64, f64)) -> Option<SensorySignal> {
        let (width, height, frequency) = frame;
        let (f_min, f_max) = self.frequency_envelope;

        let signal_frequency = f_max + (ball_x / width) * (f_min - f_max);
        let signal_period = frequency / signal_frequency;

        if self.counter == -1 || self.counter as f64 >= signal_period {
            let region_count = self.region_names.len();
            let region_height = height / region_count as f64;
            let triggered = ((ball_y / region_height).floor() as usize).min(region_count - 1);

            let signal = self
                .region_names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = if i == triggered {
                        NeuronState::Triggered
                    } else {
                        NeuronState::Resting
                    };
                    (name.clone(), vec![value; self.neurons_per_region])
                })
                .collect();

            self.counter = 0;
            Some(signal)
        } else {
            self.counter += 1;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_first_tick() {
        let mut translator =
            SignalTranslator::new(vec!["s0".into(), "s1".into()], 2, (5.0, 20.0));
        let signal = translator.step(50.0, 10.0, (100.0, 20.0, 10.0));
        assert!(signal.is_some());
    }

    #[test]
    fn test_selects_bottom_region_for_large_y() {
        let mut translator =
            SignalTranslator::new(vec!["s0".into(), "s1".into()], 2, (5.0, 20.0));
        let signal = translator.step(50.0, 19.0, (100.0, 20.0, 10.0)).unwrap();
        assert!(signal["s1"].iter().all(|s| s.is_triggered()));
        assert!(signal["s0"].iter().all(|s| !s.is_triggered()));
    }

    #[test]
    fn test_reset_timer_forces_next_tick_to_fire() {
        let mut translator =
            SignalTranslator::new(vec!["s0".into()], 1, (5.0, 5.0));
        translator.step(50.0, 0.0, (100.0, 10.0, 10.0));
        translator.reset_timer();
        assert!(translator.step(50.0, 0.0, (100.0, 10.0, 10.0)).is_some());
    }
}
