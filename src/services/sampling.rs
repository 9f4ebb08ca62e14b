//! Picks which synthetic identities and channels drive a run.
//!
//! A [`Sampler`] owns its random source and needs `&mut self` for every
//! draw. It is not meant to be shared between tasks without external
//! synchronization.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub struct Sampler<R = StdRng> {
    rng: R,
}

impl Sampler<StdRng> {
    /// Same seed, same sequence of draws.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// `count` distinct elements in random order, drawn without replacement.
    ///
    /// When `count` covers the whole population it is returned unshuffled.
    pub fn sample_subset<T: Clone>(&mut self, population: &[T], count: usize) -> Vec<T> {
        if count >= population.len() {
            return population.to_vec();
        }
        let mut shuffled = population.to_vec();
        shuffled.shuffle(&mut self.rng);
        shuffled.truncate(count);
        shuffled
    }

    /// Draws a random count in `1..=min(max, len)` and samples that many.
    pub fn sample_up_to<T: Clone>(&mut self, population: &[T], max: usize) -> Vec<T> {
        let upper = max.min(population.len());
        if upper == 0 {
            return Vec::new();
        }
        let count = self.rng.gen_range(1..=upper);
        self.sample_subset(population, count)
    }
}

/// Every element once, in the given order.
pub fn iterate_all<T>(population: &[T]) -> impl Iterator<Item = &T> + '_ {
    population.iter()
}
