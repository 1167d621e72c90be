//! Injectable randomness for fallback filler and trend synthesis.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;

    /// Uniform integer in `[0, bound)`; zero when `bound` is zero.
    fn below(&self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        let value = (self.next_f64() * f64::from(bound)).floor() as u32;
        value.min(bound - 1)
    }

    /// Uniform integer in `[low, low + span)`.
    fn in_range(&self, low: u32, span: u32) -> u32 {
        low + self.below(span)
    }
}

/// Thread-local OS-seeded generator; different output on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Reproducible generator for tests and replays.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&self) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => rng.r#gen::<f64>(),
            Err(poisoned) => poisoned.into_inner().r#gen::<f64>(),
        }
    }
}

/// Always yields the same value; pins randomized fields to an edge.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRandom(pub f64);

impl RandomSource for ConstantRandom {
    fn next_f64(&self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
