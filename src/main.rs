/*
 * Flocking Simulation
 *
 * Headless runner for the flocking core. Each boid steers by three rules,
 * in priority order, within a per-frame maneuver budget:
 * 1. Avoidance: Move away from neighbors that are too close
 * 2. Alignment: Match the velocity of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * The runner loads a TOML config, advances a 2D or 3D world for a fixed
 * number of frames and can dump the final boid states as JSON for an
 * external renderer. Logs go to stderr and are filtered with RUST_LOG.
 */

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

use flocking::{DebugInfo, FlockVector, Simulation, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "flocking", version, about = "Headless boid flocking simulation")]
struct Args {
    /// TOML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Fixed time step in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Number of spatial dimensions
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=3))]
    dimensions: u8,

    /// Override the seed from the config
    #[arg(short, long)]
    seed: Option<u64>,

    /// Step boids on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Use the spatial grid for neighbor lookups
    #[arg(long)]
    spatial_grid: bool,

    /// Print the final boid states as JSON on stdout
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if !args.dt.is_finite() || args.dt <= 0.0 {
        anyhow::bail!("--dt must be a positive number of seconds, got {}", args.dt);
    }

    match args.dimensions {
        2 => run::<glam::Vec2>(&args),
        _ => run::<glam::Vec3>(&args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config<V>(args: &Args) -> Result<SimulationConfig<V>>
where
    V: FlockVector + DeserializeOwned,
{
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.parallel |= args.parallel;
    config.spatial_grid |= args.spatial_grid;

    Ok(config)
}

fn run<V>(args: &Args) -> Result<()>
where
    V: FlockVector + Serialize + DeserializeOwned,
{
    let config = load_config::<V>(args)?;
    let mut sim = Simulation::new(&config).context("building simulation")?;

    let mut totals = DebugInfo::default();
    for _ in 0..args.frames {
        totals = totals.merge(sim.update(args.dt));
    }

    tracing::info!(
        frames = sim.frame(),
        boids = sim.agents().len(),
        sensed_pairs = totals.sensed_pairs,
        avoiding_pairs = totals.avoiding_pairs,
        saturated = totals.saturated_boids,
        chunk_size = totals.chunk_size,
        "simulation finished"
    );

    if args.dump {
        let json =
            serde_json::to_string_pretty(sim.agents()).context("serializing boid states")?;
        println!("{json}");
    }

    Ok(())
}
