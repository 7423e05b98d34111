//! Random-source abstraction.
//!
//! Quote selection and the universe-reply dice roll both go through
//! [`RandomSource`] so probability-dependent behavior is seedable under test.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform index in `0..len`. Callers guarantee `len > 0`.
    fn pick(&mut self, len: usize) -> usize;
    /// Uniform roll over 1..=100 inclusive.
    fn d100(&mut self) -> u32;
}

/// Thread-local OS-seeded randomness for production use.
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn d100(&mut self) -> u32 {
        rand::thread_rng().gen_range(1..=100)
    }
}

/// Deterministic randomness for tests.
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    fn d100(&mut self) -> u32 {
        self.0.gen_range(1..=100)
    }
}
