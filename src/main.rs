use std::env::var;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use clap::Parser;
use eyre::Result as EyreResult;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{registry, EnvFilter};

use disksim::cluster::{run_simulation, ClusterConfig};
use disksim::core::SimulationState;
use disksim::generate::random_population;
use disksim::input::{parse_input, DisplayMode};
use disksim::report::{write_round, write_summary};

/// Distributed hard-disk collision simulator.
///
/// Reads a run request from stdin: a header `N L r S mode` followed either by
/// `N` records `id x y vx vy` or by nothing, in which case a random
/// non-overlapping population is generated.
#[derive(Debug, Parser)]
#[command(name = "disksim", version)]
struct Args {
    /// Worker threads computing candidate collisions (default: all cores but
    /// one, and at least one).
    #[arg(long)]
    workers: Option<usize>,

    /// RNG seed for random population generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Deadline in seconds for any single protocol exchange.
    #[arg(long, default_value_t = 30)]
    round_timeout_secs: u64,
}

fn main() -> EyreResult<()> {
    setup()?;

    let args = Args::parse();
    let request = parse_input(io::stdin().lock())?;

    let particles = match request.particles {
        Some(particles) => particles,
        None => random_population(request.n, request.box_len, request.radius, args.seed)?,
    };
    let mut state = SimulationState::new(request.box_len, request.radius, request.steps, particles)?;

    let workers = args.workers.unwrap_or_else(|| {
        thread::available_parallelism()
            .map(|p| p.get().saturating_sub(1))
            .unwrap_or(1)
            .max(1)
    });
    let config = ClusterConfig {
        workers,
        round_timeout: Duration::from_secs(args.round_timeout_secs),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_round(&mut out, 0, &state.particles)?;

    let steps = state.steps;
    let mode = request.mode;
    run_simulation(&mut state, &config, |round, current| {
        if mode == DisplayMode::Print && round < steps {
            write_round(&mut out, round, &current.particles)?;
        }
        Ok(())
    })?;

    write_summary(&mut out, steps, &state.particles)?;
    out.flush()?;
    Ok(())
}

fn setup() -> EyreResult<()> {
    let directives = match var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => "disksim=warn".to_owned(),
    };

    registry()
        .with(EnvFilter::builder().parse(directives)?)
        .with(layer().with_writer(io::stderr))
        .init();

    color_eyre::install()?;

    Ok(())
}
