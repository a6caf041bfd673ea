//! Terrain orchestration: seed the heightfield from noise, build the neighbor
//! graph once, then run rainfall passes on demand and hand meshes to a sink.

use rand_chacha::ChaCha8Rng;

use crate::config::TerrainConfig;
use crate::erosion::{self, ErosionStats, FlowField};
use crate::error::Result;
use crate::heightfield::HeightField;
use crate::heightmap::{generate_heightfield, NoiseSource, PerlinNoise};
use crate::mesh::{flow_colors, triangle_indices, MeshData, MeshSink, Rgba};
use crate::neighbors::NeighborGraph;
use crate::seeds::TerrainSeeds;

/// Collects the inputs for a [`Terrain`] and validates them on `build`.
pub struct TerrainBuilder<'a> {
    config: TerrainConfig,
    seeds: TerrainSeeds,
    noise: Option<&'a dyn NoiseSource>,
}

impl<'a> TerrainBuilder<'a> {
    /// Starts with random seeds and Perlin noise.
    pub fn new(config: TerrainConfig) -> Self {
        Self { config, seeds: TerrainSeeds::default(), noise: None }
    }

    pub fn seed(mut self, master: u64) -> Self {
        self.seeds = TerrainSeeds::from_master(master);
        self
    }

    pub fn seeds(mut self, seeds: TerrainSeeds) -> Self {
        self.seeds = seeds;
        self
    }

    /// Replace the default Perlin source for base heights.
    pub fn noise(mut self, noise: &'a dyn NoiseSource) -> Self {
        self.noise = Some(noise);
        self
    }

    pub fn build(self) -> Result<Terrain> {
        let dims = self.config.validate()?;
        let graph = NeighborGraph::build(dims, self.config.topology);

        let heightfield = match self.noise {
            Some(noise) => generate_heightfield(dims, &self.config.octaves, noise),
            None => generate_heightfield(dims, &self.config.octaves, &PerlinNoise::new(self.seeds.noise)),
        };

        let flow = FlowField::compute(&heightfield, &graph);
        let colors = flow_colors(&flow, &self.config.colors);

        log::info!(
            "built {}x{} terrain ({} vertices), heights {:.3}..{:.3}, {}",
            dims.width(),
            dims.depth(),
            heightfield.len(),
            heightfield.min_height(),
            heightfield.max_height(),
            self.seeds
        );

        Ok(Terrain {
            triangles: triangle_indices(dims),
            rng: self.seeds.erosion_rng(),
            seeds: self.seeds,
            config: self.config,
            graph,
            heightfield,
            flow,
            colors,
            passes: 0,
            totals: ErosionStats::default(),
        })
    }
}

/// Simulation context. Owns the heightfield and lends it to the erosion
/// simulator one pass at a time; readers get immutable snapshots.
pub struct Terrain {
    config: TerrainConfig,
    seeds: TerrainSeeds,
    graph: NeighborGraph,
    heightfield: HeightField,
    triangles: Vec<u32>,
    flow: FlowField,
    colors: Vec<Rgba>,
    rng: ChaCha8Rng,
    passes: usize,
    totals: ErosionStats,
}

impl Terrain {
    /// Run one rainfall pass.
    ///
    /// The flow field is recomputed from the current heights, colours are
    /// derived from it, and then every droplet of the pass routes on that
    /// frozen field while mutating the heights.
    pub fn step(&mut self) -> ErosionStats {
        let (flow, stats) = erosion::erode_pass(
            &mut self.heightfield,
            &self.graph,
            &self.config.erosion,
            &mut self.rng,
        );
        self.colors = flow_colors(&flow, &self.config.colors);
        self.flow = flow;
        self.passes += 1;
        self.totals.merge(&stats);

        log::info!(
            "pass {}: {} droplets, {} steps (mean {:.1}), eroded {:.3}, deposited {:.3}",
            self.passes,
            stats.iterations,
            stats.steps_taken,
            stats.mean_path(),
            stats.total_eroded,
            stats.total_deposited
        );
        stats
    }

    /// Run one rainfall pass and hand the resulting mesh to `sink`.
    pub fn step_into(&mut self, sink: &mut dyn MeshSink) -> Result<ErosionStats> {
        let stats = self.step();
        self.submit(sink)?;
        Ok(stats)
    }

    /// Run `passes` rainfall passes and return their combined statistics.
    pub fn run_passes(&mut self, passes: usize) -> ErosionStats {
        let mut combined = ErosionStats::default();
        for _ in 0..passes {
            combined.merge(&self.step());
        }
        combined
    }

    /// Snapshot of the current vertices, triangles and colours.
    pub fn mesh(&self) -> MeshData {
        MeshData::new(&self.heightfield, &self.triangles, &self.colors)
    }

    pub fn submit(&self, sink: &mut dyn MeshSink) -> Result<()> {
        sink.submit(&self.mesh())
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn seeds(&self) -> TerrainSeeds {
        self.seeds
    }

    pub fn graph(&self) -> &NeighborGraph {
        &self.graph
    }

    pub fn heightfield(&self) -> &HeightField {
        &self.heightfield
    }

    /// Flow field used by the most recent pass (or the initial one).
    pub fn flow(&self) -> &FlowField {
        &self.flow
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Statistics over every pass so far.
    pub fn totals(&self) -> &ErosionStats {
        &self.totals
    }

    pub fn into_heightfield(self) -> HeightField {
        self.heightfield
    }
}
