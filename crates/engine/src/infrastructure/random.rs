//! Random implementations.

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::infrastructure::ports::RandomPort;
use crate::infrastructure::settings::EngineSettings;

/// Seeded when `random_seed` is configured, system randomness otherwise.
pub fn random_source(settings: &EngineSettings) -> Arc<dyn RandomPort> {
    match settings.random_seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(SystemRandom::new()),
    }
}

fn ordered(min: i32, max: i32) -> (i32, i32) {
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        let (lo, hi) = ordered(min, max);
        rand::thread_rng().gen_range(lo..=hi)
    }

    fn gen_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Seeded random - the same seed yields the same sequence.
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

impl RandomPort for SeededRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        let (lo, hi) = ordered(min, max);
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(lo..=hi)
    }

    fn gen_unit(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen::<f64>()
    }
}

/// Fixed random for testing.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        let (lo, hi) = ordered(min, max);
        self.0.clamp(lo, hi)
    }

    fn gen_unit(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let first: Vec<i32> = (0..20).map(|_| a.gen_range(1, 100)).collect();
        let second: Vec<i32> = (0..20).map(|_| b.gen_range(1, 100)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn range_is_inclusive_and_order_tolerant() {
        let random = SeededRandom::new(7);
        for _ in 0..1_000 {
            let v = random.gen_range(5, 3);
            assert!((3..=5).contains(&v));
        }
        assert_eq!(random.gen_range(4, 4), 4);
    }

    #[test]
    fn unit_is_half_open() {
        let random = SystemRandom::new();
        for _ in 0..1_000 {
            let v = random.gen_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
