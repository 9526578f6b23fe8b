use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

const DEFAULT_SEED: u64 = 3819201;

/// Source of randomness for playouts and for the evaluator's exploration branch.
///
/// Generators must be `Send` so per-candidate children produced by [`RandomGenerator::fork`]
/// can run on worker threads.
pub trait RandomGenerator: Default + Send {
    fn next_u64(&mut self) -> u64;

    /// Uniform integer in `from..to`. `to` must be greater than `from`.
    fn next_range(&mut self, from: usize, to: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Derives an independent child generator. For seeded generators the child is fully
    /// determined by the parent's state.
    fn fork(&mut self) -> Self;

    /// Returns `true` with the given probability. `0.0` never fires, `1.0` always does.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    fn get_random_from_slice<'a, K>(&mut self, items: &'a [K]) -> Option<&'a K> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_range(0, items.len()))
    }
}

/// Draws from the thread-local generator of `rand`. Not reproducible.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next_u64(&mut self) -> u64 {
        rand::random()
    }

    fn next_range(&mut self, from: usize, to: usize) -> usize {
        rand::rng().random_range(from..to)
    }

    fn next_f64(&mut self) -> f64 {
        rand::random()
    }

    fn fork(&mut self) -> Self {
        StandardRandomGenerator
    }
}

/// Seeded generator producing the same sequence for the same seed.
#[derive(Debug, Clone)]
pub struct CustomNumberGenerator {
    rng: ChaCha20Rng,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn next_range(&mut self, from: usize, to: usize) -> usize {
        self.rng.random_range(from..to)
    }

    fn next_f64(&mut self) -> f64 {
        self.rng.random()
    }

    fn fork(&mut self) -> Self {
        CustomNumberGenerator::new(self.rng.next_u64())
    }
}

impl CustomNumberGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}
