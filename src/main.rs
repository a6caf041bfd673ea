use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use eroded_terrain::erosion::{ErosionParams, ErosionPreset};
use eroded_terrain::export::{self, PngSink};
use eroded_terrain::mesh::{MeshSink, RecordingSink};
use eroded_terrain::{Result, TerrainBuilder, TerrainConfig, TerrainSeeds, Topology};

#[derive(Parser, Debug)]
#[command(name = "eroded_terrain")]
#[command(about = "Generate a noise heightmap and erode it with simulated rainfall")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of quads along x
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Number of quads along z
    #[arg(short = 'D', long)]
    depth: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Erosion preset (none, minimal, normal, dramatic)
    #[arg(long)]
    preset: Option<ErosionPreset>,

    /// Droplets per pass
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Maximum initial droplet mass
    #[arg(long)]
    flow_scale: Option<f32>,

    /// Neighbor wrap mode (legacy, torus)
    #[arg(long)]
    topology: Option<Topology>,

    /// Number of rainfall passes
    #[arg(short, long, default_value = "1")]
    passes: usize,

    /// Directory for heightmap and erosion-colour PNGs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn resolve_config(args: &Args) -> Result<TerrainConfig> {
    let mut config = match &args.config {
        Some(path) => TerrainConfig::load(path)?,
        None => TerrainConfig::default(),
    };
    if let Some(preset) = args.preset {
        println!("Erosion preset: {} ({})", preset, preset.description());
        config.erosion = ErosionParams::from_preset(preset);
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if let Some(iterations) = args.iterations {
        config.erosion.iterations = iterations;
    }
    if let Some(flow_scale) = args.flow_scale {
        config.erosion.flow_scale = flow_scale;
    }
    if let Some(topology) = args.topology {
        config.topology = topology;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;
    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let seeds = TerrainSeeds::from_master(seed);
    println!("Generating terrain with seed: {}", seed);
    println!("Grid: {}x{} quads, {} topology", config.width, config.depth, config.topology);

    let mut terrain = TerrainBuilder::new(config).seeds(seeds).build()?;
    let hf = terrain.heightfield();
    let initial_volume = hf.total_height();
    println!("Initial height range: {:.3} to {:.3}", hf.min_height(), hf.max_height());

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
        export::export_heightmap(terrain.heightfield(), dir.join(format!("heightmap_initial_{}.png", seed)))?;
        export::export_flow_colors(
            terrain.heightfield(),
            terrain.colors(),
            dir.join(format!("erosion_colors_initial_{}.png", seed)),
        )?;
    }

    // PNG frames per pass with an output directory, else an in-memory snapshot.
    let mut sink: Box<dyn MeshSink> = match &args.output_dir {
        Some(dir) => Box::new(PngSink::new(dir, format!("terrain_{}", seed))?),
        None => Box::new(RecordingSink::default()),
    };

    println!("Simulating {} rainfall pass(es)...", args.passes);
    for _ in 0..args.passes {
        let stats = terrain.step_into(sink.as_mut())?;
        println!(
            "  Pass {}: eroded {:.3}, deposited {:.3}, mean path {:.1} steps",
            terrain.passes(),
            stats.total_eroded,
            stats.total_deposited,
            stats.mean_path()
        );
    }

    let hf = terrain.heightfield();
    println!("Final height range: {:.3} to {:.3}", hf.min_height(), hf.max_height());
    println!("Net height change: {:+.3}", hf.total_height() - initial_volume);
    let totals = terrain.totals();
    if totals.capped_droplets > 0 {
        println!("  {} droplets hit the step cap", totals.capped_droplets);
    }

    if let Some(dir) = &args.output_dir {
        println!("Saved {} pass image pair(s) to {}", args.passes, dir.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
