use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use fire_ca_core::{
    load_grid, save_grid, CombustionState, FileSnapshotSink, FireSimulation, Material,
    OutputFailurePolicy, SceneBuilder, SimulationConfig, SimulationStats, StepBackend, TreeShape,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Cellular-automaton wildfire spread on a 2D grid
#[derive(Parser, Debug)]
#[command(name = "fire-ca")]
#[command(about = "Cellular-automaton wildfire simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the simulation and write one snapshot per step
    Run(RunArgs),
    /// Write the default hillside scene as an initial snapshot
    Scene(SceneArgs),
    /// Print a summary of a snapshot
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Number of steps to run
    #[arg(short, long)]
    steps: Option<u32>,

    /// Initial snapshot
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory the per-step snapshots are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Snapshot file name before the step number
    #[arg(long)]
    prefix: Option<String>,

    /// Snapshot file name after the step number
    #[arg(long)]
    suffix: Option<String>,

    /// Use the rayon-backed solver
    #[arg(short, long)]
    parallel: bool,

    /// Stop at the first snapshot that cannot be written
    #[arg(long)]
    strict_output: bool,
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Grid width in cells
    #[arg(long, default_value_t = 150)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 100)]
    height: usize,

    /// Hillside angle in degrees
    #[arg(long, default_value_t = 30.0)]
    slope_deg: f64,

    /// Rows of dry leaves on the hillside
    #[arg(long, default_value_t = 3)]
    leaf_thickness: i64,

    /// Cell to set burning, as `x,y` (repeatable)
    #[arg(long, value_parser = parse_coord)]
    ignite: Vec<(i64, i64)>,

    /// Output snapshot
    #[arg(short, long, default_value = "cells_state.bin")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Grid width in cells
    #[arg(long, default_value_t = 150)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 100)]
    height: usize,

    /// Snapshot to inspect
    file: PathBuf,
}

fn parse_coord(s: &str) -> Result<(i64, i64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Run(args) => run(args),
        Command::Scene(args) => scene(&args),
        Command::Inspect(args) => inspect(&args),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(steps) = args.steps {
        config.step_count = steps;
    }
    if let Some(input) = args.input {
        config.input_path = input;
    }
    if let Some(dir) = args.output_dir {
        config.output.directory = dir;
    }
    if let Some(prefix) = args.prefix {
        config.output.prefix = prefix;
    }
    if let Some(suffix) = args.suffix {
        config.output.suffix = suffix;
    }
    if args.parallel {
        config.backend = StepBackend::Parallel;
    }
    if args.strict_output {
        config.on_output_error = OutputFailurePolicy::Abort;
    }

    let mut sink = FileSnapshotSink::new(config.output.clone());
    let mut sim = FireSimulation::from_config(config).context("Failed to start simulation")?;
    let report = sim.run(&mut sink).context("Simulation aborted")?;

    info!(
        "Finished {} steps, {} snapshots written",
        report.steps_completed,
        report.checkpoints_written.len()
    );
    if !report.missing_checkpoints.is_empty() {
        info!("Missing snapshots for steps {:?}", report.missing_checkpoints);
    }
    println!("{}", report.final_stats);
    Ok(())
}

fn scene(args: &SceneArgs) -> anyhow::Result<()> {
    let mut builder =
        SceneBuilder::new(args.width, args.height).context("Invalid scene dimensions")?;
    builder
        .slope(args.slope_deg)
        .tree(TreeShape::new((40, 25), 50, 2.0, 10))
        .fallen_leaves(args.slope_deg, args.leaf_thickness);

    for &(x, y) in &args.ignite {
        if !builder.grid().contains(x, y) {
            bail!("Ignition point ({x}, {y}) is outside the {}x{} grid", args.width, args.height);
        }
        builder.ignite(x, y);
    }

    let grid = builder.build();
    save_grid(&args.output, &grid)
        .with_context(|| format!("Failed to write scene {}", args.output.display()))?;

    info!("Scene written to {}", args.output.display());
    print_summary(&SimulationStats::from_grid(0, &grid));
    Ok(())
}

fn inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let grid = load_grid(&args.file, args.width, args.height)
        .with_context(|| format!("Failed to read snapshot {}", args.file.display()))?;
    print_summary(&SimulationStats::from_grid(0, &grid));
    Ok(())
}

fn print_summary(stats: &SimulationStats) {
    println!("=== Snapshot Summary ===");
    for state in CombustionState::ALL {
        println!("  {:<8} {:>7}", format!("{state:?}"), stats.state_count(state));
    }
    println!();
    for material in Material::ALL {
        println!("  {:<8} {:>7}", material.name(), stats.material_count(material));
    }
    println!();
    println!("  Total energy: {:.1}", stats.total_energy);
}
