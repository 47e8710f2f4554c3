use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gridfleet_core::config::SimConfig;
use gridfleet_core::grid::Position;
use gridfleet_core::layout::{builtin_layouts, Layout};
use gridfleet_core::world::World;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

const BENCH_WARMUP_TICKS: usize = 10;
const BENCH_TICKS: usize = 500;

#[derive(Parser)]
#[command(name = "gridfleet")]
#[command(about = "Grid fleet simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation headlessly until every task is done
    Run {
        /// Path to an engine config file (JSON); defaults apply if omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to a layout file (JSON)
        #[arg(long, conflicts_with = "builtin")]
        layout: Option<PathBuf>,

        /// Id of a shipped layout (see `layouts`)
        #[arg(long)]
        builtin: Option<String>,

        /// Tick limit for the run
        #[arg(long, default_value_t = 10_000)]
        steps: usize,

        /// Metrics sampling interval in ticks
        #[arg(long, default_value_t = 10)]
        sample_every: usize,

        /// Output directory for summary.json (optional)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the layouts shipped with the engine
    Layouts,
    /// Run the tick-throughput benchmark suite
    Benchmark,
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let file = File::open(path).context("failed to open config file")?;
    let reader = BufReader::new(file);
    let config: SimConfig = serde_json::from_reader(reader).context("failed to parse config")?;
    Ok(config)
}

fn resolve_layout(path: Option<&PathBuf>, builtin: Option<&str>) -> Result<Option<Layout>> {
    if let Some(path) = path {
        let file = File::open(path).context("failed to open layout file")?;
        let reader = BufReader::new(file);
        let layout: Layout =
            serde_json::from_reader(reader).context("failed to parse layout")?;
        return Ok(Some(layout));
    }
    if let Some(id) = builtin {
        let Some(layout) = builtin_layouts().into_iter().find(|l| l.id == id) else {
            bail!("unknown builtin layout '{id}' (run `gridfleet layouts`)");
        };
        return Ok(Some(layout));
    }
    Ok(None)
}

fn run_command(
    config: Option<PathBuf>,
    layout: Option<PathBuf>,
    builtin: Option<String>,
    steps: usize,
    sample_every: usize,
    out: Option<PathBuf>,
) -> Result<()> {
    let sim_config = load_config(config.as_ref())?;
    sim_config.validate().context("config validation error")?;

    let mut world = World::new(sim_config).context("failed to initialize world")?;
    match resolve_layout(layout.as_ref(), builtin.as_deref())? {
        Some(layout) => {
            world
                .load_layout(&layout)
                .with_context(|| format!("layout '{}' failed validation", layout.id))?;
            // Shipped boards leave robot placement to the player; seed one
            // robot per free corner so a headless run can actually finish.
            if world.robots.is_empty() {
                seed_corner_robots(&mut world);
            }
            println!("Loaded layout '{}' ({} tasks)", layout.name, world.tasks.len());
        }
        None => {
            world.randomize_layout();
            println!(
                "Randomized layout: {} robots, {} tasks",
                world.robots.len(),
                world.tasks.len()
            );
        }
    }

    println!("Simulating up to {steps} ticks...");
    let summary = world
        .run_to_completion(steps, sample_every)
        .context("run rejected")?;

    if summary.concluded {
        println!(
            "Concluded after {} ticks: {} tasks completed, score {}",
            summary.ticks,
            summary.tasks_completed_total,
            summary.score.unwrap_or(0)
        );
    } else {
        println!(
            "Tick limit reached after {} ticks with {} tasks completed",
            summary.ticks, summary.tasks_completed_total
        );
    }

    if let Some(out_dir) = out {
        std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;
        let summary_path = out_dir.join("summary.json");
        let file = File::create(&summary_path).context("failed to create summary file")?;
        serde_json::to_writer_pretty(file, &summary).context("failed to write summary")?;
        println!("Summary saved to {summary_path:?}");
    }
    Ok(())
}

fn seed_corner_robots(world: &mut World) {
    let dims = world.grid_size();
    let corners = [
        Position(0, 0),
        Position(0, dims.cols() - 1),
        Position(dims.rows() - 1, 0),
        Position(dims.rows() - 1, dims.cols() - 1),
    ];
    for corner in corners {
        world.add_robot(corner);
    }
}

fn run_benchmark(rows: usize, cols: usize) -> Result<()> {
    let config = SimConfig {
        rows,
        cols,
        dynamic_task_spawning: true,
        spawn_probability: 1.0,
        ..SimConfig::default()
    };
    config.validate().context("benchmark config error")?;
    let mut world = World::new(config).context("failed to initialize world")?;
    world.randomize_layout();
    let robots = world.robots.len();
    world.start();

    for _ in 0..BENCH_WARMUP_TICKS {
        world.step();
    }

    let start = Instant::now();
    for _ in 0..BENCH_TICKS {
        world.step();
    }
    let elapsed = start.elapsed();

    let avg_tick_us = elapsed.as_micros() as f64 / BENCH_TICKS as f64;
    let ticks_per_sec = 1_000_000.0 / avg_tick_us;
    println!("--- {rows}x{cols} grid, {robots} robots ---");
    println!("  Avg tick:   {avg_tick_us:.0} us ({ticks_per_sec:.1} ticks/sec)");
    println!("  Completed:  {} tasks", world.tasks_completed_total());
    println!();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Layouts => {
            for layout in builtin_layouts() {
                println!(
                    "{:<20} {:<8?} {}x{}  {} tasks, {} obstacles",
                    layout.id,
                    layout.difficulty,
                    layout.grid_size.rows(),
                    layout.grid_size.cols(),
                    layout.tasks.len(),
                    layout.obstacles.len()
                );
            }
        }
        Commands::Benchmark => {
            if cfg!(debug_assertions) {
                eprintln!("WARNING: running in debug mode. Results are not representative.");
                eprintln!("         Use: cargo run -p gridfleet-cli --release -- benchmark");
                eprintln!();
            }
            println!("=== gridfleet tick throughput ===");
            println!("Warmup: {BENCH_WARMUP_TICKS} ticks, Benchmark: {BENCH_TICKS} ticks");
            println!();
            for (rows, cols) in [(10, 15), (20, 20), (40, 40), (80, 80)] {
                run_benchmark(rows, cols)?;
            }
        }
        Commands::Run {
            config,
            layout,
            builtin,
            steps,
            sample_every,
            out,
        } => {
            run_command(config, layout, builtin, steps, sample_every, out)?;
        }
    }
    Ok(())
}
