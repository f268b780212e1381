//! Deterministic stand-in trainer.
//!
//! Produces plausibly-shaped, exponentially decaying cost and error-rate
//! curves with a little seeded noise, keyed on the structure so repeated
//! calls for the same candidate agree exactly. Used by the `ss-worker`
//! binary and by tests that need cross-strategy reproducibility.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ss_types::EvalError;

use crate::adapter::Trainer;

#[derive(Debug, Clone)]
pub struct SyntheticTrainer {
    /// Every `print_period`-th epoch contributes one recorded point, so the
    /// sequences have length `epochs / print_period`.
    pub print_period: u32,
}

impl SyntheticTrainer {
    pub fn new(print_period: u32) -> Self {
        Self {
            print_period: print_period.max(1),
        }
    }

    fn seed_for(structure: &[u32], learning_rate: f64, epochs: u32) -> u64 {
        // Cheap structural hash; only determinism matters, not dispersion.
        let mut seed: u64 = 0x5113_5CA7 ^ u64::from(epochs);
        for &w in structure {
            seed = seed.wrapping_mul(31).wrapping_add(u64::from(w));
        }
        seed ^ learning_rate.to_bits()
    }
}

impl Default for SyntheticTrainer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Trainer for SyntheticTrainer {
    fn train(
        &self,
        structure: &[u32],
        learning_rate: f64,
        epochs: u32,
    ) -> Result<(Vec<f64>, Vec<f64>), EvalError> {
        let points = (epochs / self.print_period) as usize;
        if points == 0 {
            return Err(EvalError::EmptySequence {
                structure: format!("{structure:?}"),
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(Self::seed_for(structure, learning_rate, epochs));

        // Wider/deeper networks converge a bit faster here, so sweeps over
        // the synthetic trainer still produce a meaningful quality ordering.
        let capacity: f64 = structure.iter().map(|&w| f64::from(w)).sum();
        let decay = learning_rate * (1.0 + capacity.ln_1p());

        let mut costs = Vec::with_capacity(points);
        let mut error_rates = Vec::with_capacity(points);
        for i in 0..points {
            let progress = (i * self.print_period as usize) as f64;
            let noise = rng.gen_range(-0.01..0.01);
            let cost = (0.7 * (-decay * progress).exp() + 0.05 + noise).max(0.0);
            let error_rate = (0.5 * (-decay * progress * 0.8).exp() + 0.02 + noise * 0.5).max(0.0);
            costs.push(cost);
            error_rates.push(error_rate);
        }

        Ok((costs, error_rates))
    }
}
