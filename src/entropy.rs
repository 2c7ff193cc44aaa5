//! Randomness used for request pacing, header choice and demo data.
//!
//! Everything random goes through the [`Entropy`] trait so tests can pin
//! delays and header picks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random choices the scraper makes.
pub trait Entropy {
    /// A float drawn uniformly from `[lo, hi]`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;

    /// An index drawn uniformly from `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool;

    /// An integer drawn uniformly from `[lo, hi]`.
    fn int_between(&mut self, lo: i32, hi: i32) -> i32;
}

/// [`Entropy`] backed by a [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: StdRng,
}

impl SeededEntropy {
    /// Seed from the operating system.
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Entropy for SeededEntropy {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    fn int_between(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}

/// Always picks the low end, the first element, and a fixed coin.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedEntropy {
    pub coin: bool,
}

#[cfg(test)]
impl Entropy for FixedEntropy {
    fn uniform(&mut self, lo: f64, _hi: f64) -> f64 {
        lo
    }

    fn index(&mut self, _len: usize) -> usize {
        0
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.coin
    }

    fn int_between(&mut self, lo: i32, _hi: i32) -> i32 {
        lo
    }
}

/// Draws zero from every range and remembers which ranges were asked for.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingEntropy {
    pub ranges: Vec<(f64, f64)>,
}

#[cfg(test)]
impl Entropy for RecordingEntropy {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.ranges.push((lo, hi));
        0.0
    }

    fn index(&mut self, _len: usize) -> usize {
        0
    }

    fn chance(&mut self, _p: f64) -> bool {
        false
    }

    fn int_between(&mut self, lo: i32, _hi: i32) -> i32 {
        lo
    }
}
