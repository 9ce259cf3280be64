use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_POSITION: f64 = 0.999_999;

/// Source of the uniform draws used for price variation, confidence and latency jitter.
pub trait NoiseSource: Send + Sync {
    /// Uniform sample in `[low, high)`. Returns `low` when the range is empty.
    fn sample(&self, low: f64, high: f64) -> f64;
}

fn empty_range(low: f64, high: f64) -> bool {
    low.is_nan() || high.is_nan() || high <= low
}

/// Entropy- or seed-backed generator for real runs.
pub struct RandomNoise {
    rng: Mutex<StdRng>,
}

impl RandomNoise {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl NoiseSource for RandomNoise {
    fn sample(&self, low: f64, high: f64) -> f64 {
        if empty_range(low, high) {
            return low;
        }
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(low..high)
    }
}

/// Always lands at the same relative position inside the requested range.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise {
    position: f64,
}

impl FixedNoise {
    /// `position` is clamped into `[0, 1)`; 0 yields the low end of every range.
    pub fn new(position: f64) -> Self {
        let position = if position.is_finite() {
            position.clamp(0.0, MAX_POSITION)
        } else {
            0.0
        };
        Self { position }
    }

    pub fn low() -> Self {
        Self::new(0.0)
    }

    pub fn midpoint() -> Self {
        Self::new(0.5)
    }
}

impl NoiseSource for FixedNoise {
    fn sample(&self, low: f64, high: f64) -> f64 {
        if empty_range(low, high) {
            return low;
        }
        low + (high - low) * self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_noise_is_reproducible_and_in_range() {
        let first = RandomNoise::seeded(7);
        let second = RandomNoise::seeded(7);
        for _ in 0..100 {
            let a = first.sample(0.9, 1.1);
            let b = second.sample(0.9, 1.1);
            assert_eq!(a, b);
            assert!((0.9..1.1).contains(&a));
        }
    }

    #[test]
    fn empty_range_returns_low_end() {
        assert_eq!(RandomNoise::seeded(1).sample(3.0, 3.0), 3.0);
        assert_eq!(FixedNoise::midpoint().sample(5.0, 2.0), 5.0);
    }

    #[test]
    fn fixed_noise_positions() {
        assert_eq!(FixedNoise::low().sample(0.85, 0.95), 0.85);
        let mid = FixedNoise::midpoint().sample(0.9, 1.1);
        assert!((mid - 1.0).abs() < 1e-12);
        let top = FixedNoise::new(7.0).sample(0.85, 0.95);
        assert!(top < 0.95);
    }
}
