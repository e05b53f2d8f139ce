//! Random source abstraction
//!
//! All randomness used by the engine flows through [`RandomSource`] so that a
//! session can be seeded for exact replay and tests can feed literal value
//! sequences to force a specific grid. Business logic never calls a global
//! RNG directly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{EngineError, EngineResult};

/// Source of uniform random values in `[0, 1)`.
///
/// A failed source fails the whole spin; the engine never substitutes a
/// default value or a fixed grid.
pub trait RandomSource: Send {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> EngineResult<f64>;
}

/// ChaCha-backed seedable source.
///
/// The default source for live play and for deterministic replays: the same
/// seed reproduces the same grids spin for spin.
pub struct ChaChaSource {
    inner: ChaCha8Rng,
}

impl ChaChaSource {
    /// Create from an explicit seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create from OS entropy.
    pub fn from_os() -> Self {
        Self::seeded(rand::rng().random())
    }
}

impl RandomSource for ChaChaSource {
    fn next_unit(&mut self) -> EngineResult<f64> {
        Ok(self.inner.random::<f64>())
    }
}

/// Fixed-sequence source for tests.
///
/// Yields the given values in order and fails once exhausted, which doubles
/// as the failure-injection path for RNG-unavailable handling.
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, pos: 0 }
    }

    /// A source that fails on the first draw.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> EngineResult<f64> {
        let v = self
            .values
            .get(self.pos)
            .copied()
            .ok_or_else(|| EngineError::Rng("sequence source exhausted".into()))?;
        if !(0.0..1.0).contains(&v) {
            return Err(EngineError::Rng(format!("value {v} outside [0,1)")));
        }
        self.pos += 1;
        Ok(v)
    }
}
