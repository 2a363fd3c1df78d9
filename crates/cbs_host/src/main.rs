mod bench;
mod probe;
mod race;
mod stats;
mod stress;
mod telemetry;

use anyhow::Result;
use bench::Workload;
use cbs_core::Strategy;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(about = "Drive the concurrent bitset strategies from many threads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Readers scan every bit while writers set every bit; all bits must end up set.
    Stress {
        #[arg(long, value_delimiter = ',')]
        strategy: Vec<Strategy>,
        #[arg(long, value_delimiter = ',', default_values_t = [10, 100, 1000])]
        capacity: Vec<usize>,
        #[arg(long, default_value_t = 4)]
        readers: usize,
        #[arg(long, default_value_t = 4)]
        writers: usize,
        #[arg(long, default_value_t = 100)]
        passes: usize,
    },
    /// Two threads set neighbouring bits of one word and count lost updates.
    Race {
        #[arg(long, value_delimiter = ',')]
        strategy: Vec<Strategy>,
        #[arg(long, default_value_t = 1000)]
        rounds: usize,
        #[arg(long, default_value_t = 1000)]
        burst: usize,
    },
    /// Throughput of the mixed set/flip/clear/get workloads.
    Bench {
        #[arg(long, value_delimiter = ',')]
        strategy: Vec<Strategy>,
        #[arg(long, value_enum, default_value_t = Workload::UpdateAndGetOnce)]
        workload: Workload,
        #[arg(long, default_value_t = 100_000)]
        bits: usize,
        #[arg(short, long, default_value_t = 10)]
        iterations: usize,
        #[arg(long, default_value_t = 0)]
        threads: usize,
        #[arg(long)]
        shuffle: bool,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Apply `op:index` steps (get, set, clear, flip) to a fresh bitset.
    Probe {
        #[arg(long, default_value = "lock-free")]
        strategy: Strategy,
        #[arg(long, default_value_t = 64)]
        capacity: usize,
        #[arg(required = true)]
        ops: Vec<probe::ProbeOp>,
    },
}

/// Empty strategy lists select every synchronized strategy.
fn or_synchronized(strategies: Vec<Strategy>) -> Vec<Strategy> {
    if strategies.is_empty() {
        Strategy::SYNCHRONIZED.to_vec()
    } else {
        strategies
    }
}

fn main() -> Result<()> {
    telemetry::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Stress {
            strategy,
            capacity,
            readers,
            writers,
            passes,
        } => {
            let config = stress::StressConfig {
                readers,
                writers,
                passes,
            };
            stress::run_stress(&or_synchronized(strategy), &capacity, &config)?;
        }
        Commands::Race {
            strategy,
            rounds,
            burst,
        } => {
            let strategies = if strategy.is_empty() {
                Strategy::ALL.to_vec()
            } else {
                strategy
            };
            race::run_race(&strategies, rounds, burst)?;
        }
        Commands::Bench {
            strategy,
            workload,
            bits,
            iterations,
            threads,
            shuffle,
            seed,
        } => {
            let config = bench::BenchConfig {
                workload,
                bits,
                iterations,
                threads,
                shuffle: shuffle.then_some(seed),
            };
            bench::run_benchmark(&or_synchronized(strategy), &config)?;
        }
        Commands::Probe {
            strategy,
            capacity,
            ops,
        } => {
            probe::run_probe(strategy, capacity, &ops)?;
        }
    }
    Ok(())
}
