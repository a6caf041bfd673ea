//! Seed management for terrain generation
//!
//! The base noise and the rainfall simulation each get their own seed, derived
//! from a master seed by default, so either can be varied while the other
//! stays fixed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for every randomised stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Base height noise
    pub noise: u64,
    /// Droplet spawning, masses and deposit jitter
    pub erosion: u64,
}

impl TerrainSeeds {
    /// Create seeds from a master seed, deriving the sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            noise: derive_seed(master, "noise"),
            erosion: derive_seed(master, "erosion"),
        }
    }

    /// Override the noise seed
    pub fn with_noise(mut self, seed: u64) -> Self {
        self.noise = seed;
        self
    }

    /// Override the erosion seed
    pub fn with_erosion(mut self, seed: u64) -> Self {
        self.erosion = seed;
        self
    }

    /// Fresh RNG for the rainfall simulation.
    pub fn erosion_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.erosion)
    }
}

impl Default for TerrainSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Derive a sub-seed from a master seed and a stage name.
fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stage.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for TerrainSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TerrainSeeds {{ master: {}, noise: {}, erosion: {} }}",
            self.master, self.noise, self.erosion
        )
    }
}
