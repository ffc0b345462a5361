//! RNG module - injected random sources
//!
//! Every random decision of the rules engine (fresh tiles, initial board, shuffles)
//! goes through a [`RandomSource`], so a seeded source reproduces a whole game.
//!
//! Provides a simple LCG for normal play and a scripted source for tests.

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Random value in `[low, high)`. Returns `low` when the range is empty.
    fn next_int(&mut self, low: u32, high: u32) -> u32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        (**self).next_int(low, high)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        (**self).next_int(low, high)
    }
}

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
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current generator state; `SimpleRng::new(state)` continues the same sequence.
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for SimpleRng {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        low + self.next_range(high - low)
    }
}

/// Replays a fixed sequence of raw values, wrapping around at the end.
///
/// Each raw value is reduced into the requested range with `low + v % (high - low)`,
/// so a script of kind indices yields exactly those kinds when refilling a board.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        if high <= low || self.values.is_empty() {
            return low;
        }
        let raw = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        low + raw % (high - low)
    }
}
