//! Town CLI - run and inspect agent town worlds.
//!
//! - `town run` - advance a world and stream snapshots as JSON lines
//! - `town check` - load a world and print a summary

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use town_core::NodeKind;
use town_kernel::{load_world, run_ticks, SimConfig, Simulation};
use town_policy::PolicyKind;

#[derive(Parser)]
#[command(name = "town")]
#[command(about = "Deterministic agent town simulation", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a world and print one snapshot per tick
    Run {
        /// World directory (world.json, characters.json, map)
        #[arg(short, long)]
        world: PathBuf,

        /// Simulation config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Ticks to run; overrides the config
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Decision backend; overrides the config
        #[arg(short, long)]
        policy: Option<PolicyKind>,
    },

    /// Validate a world directory
    Check {
        #[arg(short, long)]
        world: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            world,
            config,
            ticks,
            policy,
        } => run_world(&world, config.as_deref(), ticks, policy),
        Commands::Check { world } => check_world(&world),
    }
}

fn run_world(
    dir: &Path,
    config_path: Option<&Path>,
    ticks: Option<u64>,
    policy: Option<PolicyKind>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(ticks) = ticks {
        config.ticks = Some(ticks);
    }
    if let Some(policy) = policy {
        config.policy = policy;
    }

    let loaded = load_world(dir)
        .with_context(|| format!("Failed to load world from {}", dir.display()))?;
    tracing::info!(
        world = %dir.display(),
        policy = %config.policy,
        ticks = ?config.ticks,
        "Starting simulation"
    );

    let simulation = Simulation::from_config(loaded, &config);
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for snapshot in run_ticks(simulation, config.ticks) {
        let snapshot = snapshot?;
        serde_json::to_writer(&mut out, &snapshot)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }

    tracing::info!("Simulation finished");
    Ok(())
}

fn check_world(dir: &Path) -> Result<()> {
    let loaded = load_world(dir)
        .with_context(|| format!("Failed to load world from {}", dir.display()))?;
    let count = |kind| loaded.world.nodes_of_kind(kind).count();

    println!("World: {}", dir.display());
    println!();
    println!(
        "Areas: {} ({} sub-areas)",
        count(NodeKind::Area) + count(NodeKind::SubArea),
        count(NodeKind::SubArea)
    );
    println!("Objects: {}", count(NodeKind::Object));
    println!("Grid: {}x{}", loaded.grid.width(), loaded.grid.height());
    println!();
    println!("Agents: {}", loaded.agents.len());
    for agent in loaded.agents.values() {
        println!(
            "  - {} ({}) in {} at ({}, {})",
            agent.agent_id,
            agent.name,
            loaded.world.area_name(&agent.agent_id),
            agent.position.x,
            agent.position.y
        );
    }
    Ok(())
}
