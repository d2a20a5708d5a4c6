//! Seeded train/validation/test partitioning.
//!
//! Two sequential holdouts: first `ceil(0.25 * n)` rows go to test, then
//! `ceil(0.33 * rest)` of the remainder go to validation. Each holdout
//! shuffles with a fresh ChaCha RNG seeded from the same seed, so a seed and a
//! row count fully determine the partition.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Fraction of all rows held out for testing.
pub const TEST_FRACTION: f64 = 0.25;

/// Fraction of the non-test rows held out for validation (about a third).
pub const VALIDATION_FRACTION: f64 = 0.33;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Row indices of each partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSplit {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

impl DatasetSplit {
    /// Partition `0..n` into train/validation/test (about 50/25/25).
    #[must_use]
    pub fn new(n: usize, seed: u64) -> Self {
        let all: Vec<usize> = (0..n).collect();
        let (rest, test) = holdout(all, TEST_FRACTION, seed);
        let (train, validation) = holdout(rest, VALIDATION_FRACTION, seed);
        Self {
            train,
            validation,
            test,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }
}

/// Shuffle and hold out `ceil(fraction * len)` indices.
///
/// Returns `(kept, held_out)`.
fn holdout(mut indices: Vec<usize>, fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let n_held = ((fraction * indices.len() as f64).ceil() as usize).min(indices.len());
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let kept = indices.split_off(n_held);
    (kept, indices)
}
