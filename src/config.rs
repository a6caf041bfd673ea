//! Terrain configuration, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::erosion::ErosionParams;
use crate::error::Result;
use crate::grid::{GridDims, Topology};
use crate::heightmap::{validate_octaves, NoiseOctave, DEFAULT_OCTAVES, OCTAVE_COUNT};
use crate::mesh::ColorParams;

/// Everything needed to build a terrain except the seeds.
///
/// Missing JSON fields fall back to the defaults, so a config file only has
/// to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Quads along x
    pub width: usize,
    /// Quads along z
    pub depth: usize,
    pub topology: Topology,
    pub octaves: [NoiseOctave; OCTAVE_COUNT],
    pub erosion: ErosionParams,
    pub colors: ColorParams,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 20,
            depth: 20,
            topology: Topology::Legacy,
            octaves: DEFAULT_OCTAVES,
            erosion: ErosionParams::default(),
            colors: ColorParams::default(),
        }
    }
}

impl TerrainConfig {
    /// Check every section and return the validated grid size.
    pub fn validate(&self) -> Result<GridDims> {
        let dims = GridDims::new(self.width, self.depth)?;
        validate_octaves(&self.octaves)?;
        self.erosion.validate()?;
        Ok(dims)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
