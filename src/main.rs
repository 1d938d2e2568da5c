//! Tile Agents - headless runner
//!
//! Builds a world, spawns a population and runs a fixed number of ticks,
//! then prints a summary as text or JSON.

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use tile_agents::core::error::Result;
use tile_agents::entity::needs::DecayPolicy;
use tile_agents::entity::personality::Personality;
use tile_agents::simulation::snapshot::{AgentSnapshot, PopulationSummary};
use tile_agents::{NavGrid, NavWorld, SimEvent, Simulation, SimulationConfig, TerrainGrid};

/// Archetypes handed out round-robin to spawned agents
const ARCHETYPES: [&str; 5] = ["duck", "amoeba", "wanderer", "stalker", "grass"];

/// Headless tile-agent simulation
#[derive(Parser, Debug)]
#[command(name = "tile-agents")]
#[command(about = "Run a tile-grid agent simulation and report what the agents did")]
struct Args {
    /// Number of agents to spawn
    #[arg(long, default_value_t = 20)]
    agents: usize,

    /// Number of ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Milliseconds per tick
    #[arg(long, default_value_t = 16.0)]
    dt: f32,

    /// Map width in tiles
    #[arg(long, default_value_t = 40)]
    cols: i32,

    /// Map height in tiles
    #[arg(long, default_value_t = 30)]
    rows: i32,

    /// Tile edge length in world units
    #[arg(long, default_value_t = 16.0)]
    tile_size: f32,

    /// Fraction of tiles blocked on an obstacle map
    #[arg(long, default_value_t = 0.15)]
    obstacles: f64,

    /// Generate a terrain map (water border, forest, mountains) instead
    #[arg(long)]
    terrain: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Give each agent an archetype personality
    #[arg(long)]
    personalities: bool,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    seed: u64,
    ticks: u64,
    elapsed_ms: f64,
    goal_switches: usize,
    arrivals: usize,
    missing_paths: usize,
    meetings: usize,
    summary: PopulationSummary,
    agents: Vec<AgentSnapshot>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tile_agents=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let mut map_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let report = if args.terrain {
        if args.config.is_none() {
            config.needs.policy = DecayPolicy::TerrainModulated;
        }
        let nav = TerrainGrid::generate(args.cols, args.rows, args.tile_size, &mut map_rng)?;
        run(Simulation::new(nav, config)?, &args, seed)
    } else {
        let nav = NavWorld::generate(
            args.cols,
            args.rows,
            args.tile_size,
            args.obstacles,
            &mut map_rng,
        )?;
        run(Simulation::new(nav, config)?, &args, seed)
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }
    Ok(())
}

fn run<G: NavGrid>(mut sim: Simulation<G>, args: &Args, seed: u64) -> RunReport {
    for i in 0..args.agents {
        let Some(entity) = sim.spawn_random() else {
            tracing::warn!("Map has no walkable tiles, spawned {} of {} agents", i, args.agents);
            break;
        };
        if args.personalities {
            let personality = Personality::by_name(ARCHETYPES[i % ARCHETYPES.len()]);
            sim.world_mut().add_component(entity, personality);
        }
    }

    let mut report = RunReport {
        seed,
        ticks: args.ticks,
        elapsed_ms: 0.0,
        goal_switches: 0,
        arrivals: 0,
        missing_paths: 0,
        meetings: 0,
        summary: PopulationSummary::default(),
        agents: Vec::new(),
    };

    for _ in 0..args.ticks {
        for event in sim.update(args.dt) {
            match event {
                SimEvent::GoalChosen { .. } => report.goal_switches += 1,
                SimEvent::TargetReached { .. } => report.arrivals += 1,
                SimEvent::PathNotFound { .. } => report.missing_paths += 1,
                SimEvent::Met { .. } => report.meetings += 1,
            }
        }
    }

    report.elapsed_ms = sim.elapsed_ms();
    report.agents = sim.snapshot();
    report.summary = PopulationSummary::from_snapshots(&report.agents);
    tracing::info!(
        "Ran {} ticks ({:.0} ms simulated) with {} agents",
        args.ticks,
        report.elapsed_ms,
        report.summary.agents
    );
    report
}

fn print_text(report: &RunReport) {
    println!("\n=== TILE AGENTS ===");
    println!(
        "Seed: {}  Ticks: {}  Simulated: {:.1}s",
        report.seed,
        report.ticks,
        report.elapsed_ms / 1000.0
    );
    println!("Agents: {}", report.summary.agents);
    println!();
    println!("Events:");
    println!("  goal switches   {}", report.goal_switches);
    println!("  arrivals        {}", report.arrivals);
    println!("  missing paths   {}", report.missing_paths);
    println!("  meetings        {}", report.meetings);
    println!();
    println!("Goals:");
    for (goal, count) in &report.summary.goals {
        println!("  {:<10} {}", goal, count);
    }
    if let Some(needs) = &report.summary.mean_needs {
        println!();
        println!("Mean needs:");
        println!("  hunger    {:5.1}", needs.hunger);
        println!("  energy    {:5.1}", needs.energy);
        println!("  social    {:5.1}", needs.social);
        println!("  safety    {:5.1}", needs.safety);
        println!("  curiosity {:5.1}", needs.curiosity);
    }
}
