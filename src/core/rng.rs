//! RNG module - seedable randomness and weighted rank spawning
//!
//! Sessions own their generator; there is no global RNG. The LCG makes every
//! level attempt reproducible from its seed, which is what the refill and
//! reshuffle tests rely on.

use crate::types::Rank;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Pick one element uniformly. Panics on an empty slice.
    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> &'a T {
        &slice[self.next_range(slice.len() as u32) as usize]
    }

    /// Current internal state (reusable as a seed for restarts)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Weighted rank spawn table from the level rules.
///
/// Weights need not sum to anything in particular: a draw rolls
/// `uniform(0, total)` and subtracts weights in entry order until the roll
/// goes negative.
#[derive(Debug, Clone)]
pub struct SpawnTable {
    entries: Vec<(Rank, u32)>,
    total: u32,
}

impl SpawnTable {
    /// Build a table from (rank, weight) entries. Zero-weight entries are
    /// kept but can never be drawn. An all-zero table (misconfigured rules)
    /// degrades to a uniform draw over its entries instead of being
    /// undrawable.
    pub fn new(mut entries: Vec<(Rank, u32)>) -> Self {
        let mut total = entries.iter().map(|(_, w)| w).sum();
        if total == 0 && !entries.is_empty() {
            for (_, weight) in &mut entries {
                *weight = 1;
            }
            total = entries.len() as u32;
        }
        Self { entries, total }
    }

    /// Draw one rank according to the weights
    pub fn draw(&self, rng: &mut SimpleRng) -> Rank {
        if self.total == 0 {
            // Empty table: nothing to weight, return the lowest rank.
            return Rank::Iron;
        }
        let mut roll = rng.next_range(self.total) as i64;
        for (rank, weight) in &self.entries {
            roll -= *weight as i64;
            if roll < 0 {
                return *rank;
            }
        }
        // Unreachable with a positive total; fall back to the last entry.
        self.entries.last().map(|(rank, _)| *rank).unwrap_or(Rank::Iron)
    }
}
