//! Deterministic utilities for reproducible training
//!
//! Provides an LCG-based RNG, the seeded train/test split and the split
//! tie-breaker so that identical inputs always produce identical forests.

use std::num::Wrapping;

/// Fraction of rows held out for evaluation, in parts per million
pub const HOLDOUT_PPM: u64 = 200_000;

/// 64-bit Linear Congruential Generator for deterministic pseudo-randomness
/// Uses Knuth's MMIX constants; output is taken from the high bits
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<u64>,
}

impl LcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        let mut rng = Self {
            state: Wrapping(seed),
        };
        // Discard the first output so nearby seeds diverge immediately
        rng.next_u32();
        rng
    }

    /// Independent stream derived from this seed, e.g. one per tree
    pub fn derive(seed: u64, stream: u64) -> Self {
        Self::new(seed ^ stream.wrapping_add(1).wrapping_mul(0x9E3779B97F4A7C15))
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        (self.state.0 >> 32) as u32
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        let wide = (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32());
        (wide % max as u64) as usize
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_range(i + 1);
            items.swap(i, j);
        }
    }

    /// `n` draws with replacement from `population`
    pub fn bootstrap(&mut self, population: &[usize], n: usize) -> Vec<usize> {
        (0..n)
            .map(|_| population[self.next_range(population.len())])
            .collect()
    }
}

/// Row indices of the train and test partitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Shuffle `0..n` with `seed` and hold out `ceil(n * HOLDOUT_PPM / 1e6)` rows
    ///
    /// Returns `None` when either partition would be empty.
    pub fn new(n: usize, seed: u64) -> Option<Self> {
        let test_len = ((n as u64 * HOLDOUT_PPM).div_ceil(1_000_000)) as usize;
        if test_len == 0 || test_len >= n {
            return None;
        }

        let mut indices: Vec<usize> = (0..n).collect();
        LcgRng::new(seed).shuffle(&mut indices);

        let train = indices.split_off(test_len);
        Some(Self {
            train,
            test: indices,
        })
    }
}

/// Deterministic tie-breaker for split selection
/// Returns consistent ordering based on (feature_idx, threshold, node_id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SplitTieBreaker {
    pub feature_idx: usize,
    pub threshold: i64,
    pub node_id: usize,
}

impl SplitTieBreaker {
    pub fn new(feature_idx: usize, threshold: i64, node_id: usize) -> Self {
        Self {
            feature_idx,
            threshold,
            node_id,
        }
    }
}
