//! xorshift64* random number generator
//!
//! Fast, high-quality PRNG that is deterministic and suitable for
//! reproducible simulation episodes.
//!
//! # Determinism
//!
//! Same seed → same sequence of draws. This is CRITICAL for:
//! - Reproducing an episode that aborted with a degenerate belief
//! - Testing (fixed inspection outcomes without forcing flags)
//! - Parallel policy sweeps (each episode owns its own generator)

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let u = rng.uniform();            // [0.0, 1.0)
/// let detected = rng.bernoulli(0.3);
/// assert!((0.0..1.0).contains(&u));
/// let _ = detected;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift requirement).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random f64 in range [0.0, 1.0)
    ///
    /// Used for sampling detection thresholds from the inverse PoD curve.
    pub fn uniform(&mut self) -> f64 {
        let value = self.next();
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Draw a Bernoulli outcome with success probability `p`
    ///
    /// `p <= 0.0` never succeeds; `p >= 1.0` always succeeds.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// Current generator state, for reproducing an episode mid-stream
    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    fn test_uniform_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.uniform();
            assert!(
                (0.0..1.0).contains(&val),
                "uniform() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_uniform_deterministic() {
        let mut rng1 = RngManager::new(99999);
        let mut rng2 = RngManager::new(99999);

        for _ in 0..100 {
            assert_eq!(rng1.uniform(), rng2.uniform(), "uniform() not deterministic");
        }
    }

    #[test]
    fn test_bernoulli_extremes() {
        let mut rng = RngManager::new(7);

        for _ in 0..100 {
            assert!(!rng.bernoulli(0.0), "p = 0 must never succeed");
            assert!(rng.bernoulli(1.0), "p = 1 must always succeed");
        }
    }
}
