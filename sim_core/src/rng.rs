//! Seeded random source shared by every stochastic rule

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of distinct values `next_integer` can return (2^64)
pub const SPAN: u128 = 1 << 64;

/// Scale a probability onto the integer draw range, saturating at the span
pub fn scale_probability(chance: f64) -> u128 {
    if chance <= 0.0 || chance.is_nan() {
        return 0;
    }
    ((chance * SPAN as f64) as u128).min(SPAN)
}

/// Seeded pseudo-random generator
///
/// Two sources built from the same seed produce the same sequence, which is
/// what makes whole runs reproducible.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        RandomSource {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the thread RNG when no seed was configured
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw over the full `u64` range
    pub fn next_integer(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// True with probability `chance`
    pub fn chance(&mut self, chance: f64) -> bool {
        if chance >= 1.0 {
            return true;
        }
        if chance <= 0.0 || chance.is_nan() {
            return false;
        }
        let threshold = scale_probability(chance) as u64;
        threshold > self.next_integer()
    }

    /// Uniform integer in `min..=max`
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return max;
        }
        self.rng.gen_range(min..=max)
    }
}
