use gravsim::{is_yaml_path, resolve_threads, Engine, Matrix, Parameters, Physics, ProgressLog, Scenario, ScenarioConfig, SimError};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Brute-force gravitational N-body simulation
#[derive(Parser, Debug)]
#[command(version, about, allow_negative_numbers = true)]
struct Args {
    /// Time between steps (s)
    time_step: f64,

    /// Total simulated time (s)
    total_time: f64,

    /// Number of positions to record per body
    outputs_per_body: usize,

    /// n-by-7 .npy matrix [m, x, y, z, vx, vy, vz], or a .yaml scenario
    input: PathBuf,

    /// Output .npy trajectory, outputs-by-3n
    output: PathBuf,

    /// Worker threads (default: physical cores)
    num_threads: Option<usize>,

    /// Override the gravitational constant
    #[arg(long)]
    gravity: Option<f64>,

    /// Override the softening term added to squared distances
    #[arg(long)]
    softening: Option<f64>,
}

// load here to keep main clean
fn load_scenario(args: &Args) -> Result<Scenario> {
    let scenario = if is_yaml_path(&args.input) {
        let mut cfg = ScenarioConfig::from_yaml_path(&args.input)
            .with_context(|| format!("error reading input {}", args.input.display()))?;
        if let Some(g) = args.gravity {
            cfg.physics.G = g;
        }
        if let Some(eps) = args.softening {
            cfg.physics.softening = eps;
        }
        Scenario::build_scenario(cfg)?
    } else {
        let input = Matrix::from_npy_path(&args.input)
            .with_context(|| format!("error reading input {}", args.input.display()))?;
        let defaults = Physics::default();
        let physics = Physics {
            G: args.gravity.unwrap_or(defaults.G),
            softening: args.softening.unwrap_or(defaults.softening),
        };
        Scenario::from_matrix(&input, physics)?
    };
    Ok(scenario)
}

fn run(args: Args) -> Result<()> {
    // argument errors first, before touching the input file
    let parameters = Parameters::derive(args.time_step, args.total_time, args.outputs_per_body)?;
    if args.num_threads == Some(0) {
        return Err(SimError::NoThreads.into());
    }

    let scenario = load_scenario(&args)?;
    let threads = resolve_threads(args.num_threads, scenario.system.len())?;

    // start the clock
    let start = Instant::now();

    let mut progress = ProgressLog::new(parameters.output_steps, parameters.num_steps, scenario.physics);
    let engine = Engine::new(scenario, parameters, threads).context("error allocating simulation state")?;
    let output = engine.run_with(&mut progress)?;

    println!("{:.6} secs", start.elapsed().as_secs_f64());

    output
        .to_npy_path(&args.output)
        .with_context(|| format!("error writing output {}", args.output.display()))?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
