//! Random - Uniform draw source used by the spawners
//!
//! Any `rand` generator works as a source. Tests can swap in a
//! `ScriptedSource` to force exact spawn decisions.

use rand::RngCore;

/// Source of uniform draws in [0, 1)
pub trait RandomSource {
    fn uniform(&mut self) -> f64;

    /// Uniform index into a collection of `len` items (`len` > 0)
    fn index(&mut self, len: usize) -> usize {
        ((self.uniform() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl<R: RngCore> RandomSource for R {
    fn uniform(&mut self) -> f64 {
        rand::Rng::gen::<f64>(self)
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that never triggers a probabilistic spawn
    pub fn never() -> Self {
        Self::new(vec![0.999_999])
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 0.999_999_999)
    }
}
