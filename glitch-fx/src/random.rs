//! The run-wide random stream.
//!
//! One [`RandomStream`] is created per pipeline run and passed by `&mut` to
//! every compositor, so a seed fully determines the resulting layout. Not
//! `Clone`; a copy would replay draws.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Seeded, ordered pseudo-random sequence.
#[derive(Debug)]
pub struct RandomStream {
    seed: u64,
    rng: StdRng,
    draws: u64,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen::<f64>()
    }

    /// Uniform integer in `[lo, hi)`; `lo` when the range is empty.
    pub fn range(&mut self, lo: i64, hi: i64) -> i64 {
        self.draws += 1;
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Uniform index into a collection of `len` items; 0 when empty.
    pub fn index(&mut self, len: usize) -> usize {
        self.draws += 1;
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// Uniformly shuffle `items` in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        self.draws += 1;
        items.shuffle(&mut self.rng);
    }
}
