//! Random source used by maze generation.
//!
//! [`RandomSource`] is deliberately tiny so tests can script the exact cells
//! the generator tries. Production code uses a seeded [`fastrand::Rng`].

use fastrand::Rng;

pub trait RandomSource {
    /// Uniform index in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl RandomSource for Rng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.usize(..bound)
    }
}

/// Replays a fixed list of values, wrapping around when exhausted.
///
/// Each value is reduced modulo the requested bound.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<usize>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        ScriptedSource {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for ScriptedSource {
    fn next_index(&mut self, bound: usize) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v % bound
    }
}
