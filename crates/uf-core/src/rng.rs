//! Random number generation for onset delays.
//!
//! Uses a seeded ChaCha RNG so tests are reproducible. The host is expected
//! to seed one generator per world, matching its world-scoped RNG.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// World-scoped random number generator.
///
/// Only the seed is serialized; a restored generator restarts its stream.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed used to create this RNG.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in [0, 1).
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform onset delay in [min, max] hours.
    ///
    /// Inverted bounds are swapped before use; equal bounds degenerate to
    /// that exact value without consuming a draw.
    pub fn uniform_hours(&mut self, min: f64, max: f64) -> f64 {
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        if min == max {
            return min;
        }
        min + self.uniform() * (max - min)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
