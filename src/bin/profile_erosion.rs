//! Profiling tool to identify performance bottlenecks

use std::time::Instant;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use eroded_terrain::{
    erosion::{self, ErosionParams, FlowField},
    heightmap::{self, PerlinNoise, DEFAULT_OCTAVES},
    GridDims, NeighborGraph, Topology,
};

fn main() {
    let width = 256;
    let depth = 256;
    let seed = 1337u64;
    let passes = 5;

    let Ok(dims) = GridDims::new(width, depth) else {
        eprintln!("invalid grid size {}x{}", width, depth);
        return;
    };

    println!("=== Performance Profiling ===");
    println!("Grid size: {}x{} quads ({} vertices)", width, depth, dims.cell_count());
    println!();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // Profile neighbor graph construction
    let start = Instant::now();
    let graph = NeighborGraph::build(dims, Topology::Legacy);
    let graph_time = start.elapsed();
    println!("Neighbor graph: {:?}", graph_time);

    // Profile heightfield generation
    let start = Instant::now();
    let mut heightfield = heightmap::generate_heightfield(dims, &DEFAULT_OCTAVES, &PerlinNoise::new(seed));
    let heightmap_time = start.elapsed();
    println!("Heightfield generation: {:?}", heightmap_time);

    // Profile a single flow field in isolation
    let start = Instant::now();
    let flow = FlowField::compute(&heightfield, &graph);
    let flow_time = start.elapsed();
    println!("Flow field: {:?} ({} sinks)", flow_time, flow.sink_count());

    let params = ErosionParams {
        iterations: dims.cell_count(),
        ..Default::default()
    };
    println!("\nErosion parameters:");
    println!("  Droplets per pass: {}", params.iterations);
    println!("  Flow scale: {}", params.flow_scale);
    println!("  Passes: {}", passes);
    println!();

    let start = Instant::now();
    let mut totals = erosion::ErosionStats::default();
    for _ in 0..passes {
        let (_flow, stats) = erosion::erode_pass(&mut heightfield, &graph, &params, &mut rng);
        totals.merge(&stats);
    }
    let erosion_time = start.elapsed();
    println!("Total erosion simulation: {:?}", erosion_time);
    println!("  Eroded: {:.0} units", totals.total_eroded);
    println!("  Deposited: {:.0} units", totals.total_deposited);
    println!("  Steps: {} (longest path {})", totals.steps_taken, totals.longest_path);

    // Summary
    let total = graph_time + heightmap_time + flow_time + erosion_time;
    println!("\n=== Summary ===");
    println!("Neighbor graph:   {:>8.2}% ({:?})", 100.0 * graph_time.as_secs_f64() / total.as_secs_f64(), graph_time);
    println!("Heightfield:      {:>8.2}% ({:?})", 100.0 * heightmap_time.as_secs_f64() / total.as_secs_f64(), heightmap_time);
    println!("Flow field:       {:>8.2}% ({:?})", 100.0 * flow_time.as_secs_f64() / total.as_secs_f64(), flow_time);
    println!("Erosion:          {:>8.2}% ({:?})", 100.0 * erosion_time.as_secs_f64() / total.as_secs_f64(), erosion_time);
    println!("─────────────────────────────────");
    println!("TOTAL:            {:>8}  {:?}", "100%", total);
}
