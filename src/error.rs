//! Error type shared by the terrain builder, configuration loading and export.

use thiserror::Error;

/// Errors raised while configuring or exporting a terrain.
///
/// The erosion simulation itself never fails once a terrain is built; every
/// variant here is produced either by validation or by I/O.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("grid dimensions must be at least 1x1, got {width}x{depth}")]
    InvalidDimensions { width: usize, depth: usize },

    #[error("grid of {width}x{depth} quads has more vertices than a u32 mesh index can address")]
    GridTooLarge { width: usize, depth: usize },

    #[error("droplet mass range [{min}, {max}] is invalid: need 0 < min <= max")]
    InvalidMassRange { min: f32, max: f32 },

    #[error("noise octave {index} is invalid: {reason}")]
    InvalidOctave { index: usize, reason: &'static str },

    #[error("max_steps must be at least 1")]
    InvalidStepCap,

    #[error("failed to parse terrain config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TerrainError>;
