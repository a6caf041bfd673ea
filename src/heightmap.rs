use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::grid::GridDims;
use crate::heightfield::HeightField;

// =============================================================================
// NOISE SOURCES
// =============================================================================

/// Deterministic 2D noise returning values in `[0, 1]`.
pub trait NoiseSource {
    fn sample(&self, x: f64, z: f64) -> f64;
}

/// Perlin noise remapped from `[-1, 1]` to `[0, 1]`.
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    pub fn new(seed: u64) -> Self {
        Self { perlin: Perlin::new(fold_seed(seed)) }
    }
}

/// Fold a 64-bit seed into the 32 bits `Perlin` takes, keeping the high half.
fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, x: f64, z: f64) -> f64 {
        ((self.perlin.get([x, z]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// Returns the same value everywhere. Useful for flat test terrain.
#[derive(Clone, Copy, Debug)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn sample(&self, _x: f64, _z: f64) -> f64 {
        self.0
    }
}

// =============================================================================
// OCTAVES
// =============================================================================

/// One noise layer: sampled at `(x * frequency, z * frequency)` and scaled by
/// `amplitude`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseOctave {
    pub frequency: f64,
    pub amplitude: f64,
}

impl NoiseOctave {
    pub const fn new(frequency: f64, amplitude: f64) -> Self {
        Self { frequency, amplitude }
    }
}

pub const OCTAVE_COUNT: usize = 5;

/// Low frequencies carry the large amplitudes.
pub const DEFAULT_OCTAVES: [NoiseOctave; OCTAVE_COUNT] = [
    NoiseOctave::new(0.1, 5.0),
    NoiseOctave::new(0.2, 4.0),
    NoiseOctave::new(0.3, 3.0),
    NoiseOctave::new(0.4, 2.0),
    NoiseOctave::new(0.5, 1.0),
];

pub fn validate_octaves(octaves: &[NoiseOctave]) -> Result<()> {
    for (index, octave) in octaves.iter().enumerate() {
        if !octave.frequency.is_finite() {
            return Err(TerrainError::InvalidOctave { index, reason: "frequency is not finite" });
        }
        if !octave.amplitude.is_finite() || octave.amplitude < 0.0 {
            return Err(TerrainError::InvalidOctave {
                index,
                reason: "amplitude must be finite and non-negative",
            });
        }
    }
    Ok(())
}

/// Sum of octave amplitudes; half of it is the height offset that centres
/// the terrain around zero.
pub fn amplitude_sum(octaves: &[NoiseOctave]) -> f64 {
    octaves.iter().map(|o| o.amplitude).sum()
}

// =============================================================================
// HEIGHT SAMPLING
// =============================================================================

/// `Σ noise(x·f, z·f)·a − (Σ a) / 2`
pub fn sample_base_height<N: NoiseSource + ?Sized>(
    noise: &N,
    octaves: &[NoiseOctave],
    x: usize,
    z: usize,
) -> f32 {
    let (x, z) = (x as f64, z as f64);
    let layered: f64 = octaves
        .iter()
        .map(|o| noise.sample(x * o.frequency, z * o.frequency) * o.amplitude)
        .sum();
    (layered - amplitude_sum(octaves) / 2.0) as f32
}

/// Seed a heightfield from layered noise.
pub fn generate_heightfield<N: NoiseSource + ?Sized>(
    dims: GridDims,
    octaves: &[NoiseOctave],
    noise: &N,
) -> HeightField {
    HeightField::from_fn(dims, |x, z| sample_base_height(noise, octaves, x, z))
}
