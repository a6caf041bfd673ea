//! Heightmap terrain generation with droplet-based hydraulic erosion
//!
//! Re-exports modules for use by binaries and tools.

pub mod config;
pub mod erosion;
pub mod error;
pub mod export;
pub mod grid;
pub mod heightfield;
pub mod heightmap;
pub mod mesh;
pub mod neighbors;
pub mod seeds;
pub mod terrain;

pub use config::TerrainConfig;
pub use error::{Result, TerrainError};
pub use grid::{GridDims, Topology};
pub use heightfield::{HeightField, Vertex};
pub use neighbors::NeighborGraph;
pub use seeds::TerrainSeeds;
pub use terrain::{Terrain, TerrainBuilder};
