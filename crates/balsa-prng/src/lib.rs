//! Seeded pseudo-random number generation for balsa.
//!
//! Randomness is always injected through an explicit [`SeededRng`]; nothing
//! in the workspace reads hidden global seed state, so every shuffled-order
//! tree build can be replayed from its seed.

use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;

/// A seeded pseudo-random number generator.
pub struct SeededRng {
    rng: rand::rngs::StdRng,
}

impl SeededRng {
    /// Create a new seeded RNG from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a random integer in the given inclusive range.
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        self.rng.random_range(min..=max)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.rng);
    }

    /// Every integer of `lower..=upper` exactly once, in seeded-random
    /// order. An inverted range yields an empty vec.
    pub fn shuffled_range(&mut self, lower: i32, upper: i32) -> Vec<i32> {
        let mut keys: Vec<i32> = (lower..=upper).collect();
        self.shuffle(&mut keys);
        keys
    }

    /// Reset the RNG to its initial state with the same seed.
    pub fn reset(&mut self, seed: u64) {
        self.rng = rand::rngs::StdRng::seed_from_u64(seed);
    }
}
