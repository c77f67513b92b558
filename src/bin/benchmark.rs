use clap::Parser;
use anyhow::Result;

use gravsim::{bench_forces, bench_threads};

#[derive(Parser, Debug)]
#[command(about = "Time force evaluation and full steps across thread counts")]
struct Args {
    /// Threads for the parallel force benchmark (default: physical cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Body count for the thread sweep
    #[arg(short, long, default_value_t = 2000)]
    number: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let threads = args.threads.unwrap_or_else(num_cpus::get_physical).max(1);

    bench_forces(threads)?;
    bench_threads(args.number, threads)?;

    Ok(())
}
