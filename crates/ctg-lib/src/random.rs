//! Uniform variates drawn from an injectable source.
//!
//! Every synthesizer takes `&mut impl RandomSource` so tests can replay an
//! exact sequence of unit draws through [`ScriptedSource`].

use rand::{rngs::StdRng, Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `[lo, hi]`, both ends inclusive.
    fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        let span = (hi - lo + 1) as f64;
        (self.next_unit() * span).floor() as i64 + lo
    }

    /// Uniform float in `[lo, hi)`.
    fn float_in(&mut self, lo: f64, hi: f64) -> f64 {
        self.next_unit() * (hi - lo) + lo
    }

    /// Uniform float in `[-1, 1)`.
    fn signed_unit(&mut self) -> f64 {
        (self.next_unit() - 0.5) * 2.0
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Builds the production source, seeded when a seed is given.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Replays a fixed list of unit draws, wrapping around when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(draws: Vec<f64>) -> Self {
        let draws = if draws.is_empty() { vec![0.5] } else { draws };
        Self { draws, cursor: 0 }
    }

    /// A source that always returns the same draw.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
