//! Throughput workloads.
//!
//! Each iteration builds a fresh bitset and submits every (operation, bit)
//! pair of the workload to a rayon pool at once, so sets, flips, clears and
//! reads of the same bits interleave across workers.

use crate::stats::{LatencyStats, format_nanos};
use anyhow::{Context, Result};
use cbs_core::{AnyBitSet, BitOp, ConcurrentBitSet, Strategy};
use clap::ValueEnum;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Workload {
    /// Set, flip, clear and read every bit once.
    UpdateAndGetOnce,
    /// Update every bit once, read it six times.
    ReadMany,
    /// Set five times, flip and clear six times, read once.
    UpdateMany,
}

/// One submitted unit of work against a single bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Update { op: BitOp, repeat: usize },
    Get { repeat: usize },
}

impl Task {
    fn ops(self) -> usize {
        match self {
            Task::Update { repeat, .. } | Task::Get { repeat } => repeat,
        }
    }

    fn run(self, bitset: &AnyBitSet, bit_index: usize) -> cbs_core::Result<()> {
        match self {
            Task::Update { op, repeat } => {
                for _ in 0..repeat {
                    bitset.update(bit_index, op)?;
                }
            }
            Task::Get { repeat } => {
                for _ in 0..repeat {
                    std::hint::black_box(bitset.get(bit_index)?);
                }
            }
        }
        Ok(())
    }
}

impl Workload {
    fn phases(self) -> [Task; 4] {
        let (set, flip, clear, get) = match self {
            Workload::UpdateAndGetOnce => (1, 1, 1, 1),
            Workload::ReadMany => (1, 1, 1, 6),
            Workload::UpdateMany => (5, 6, 6, 1),
        };
        [
            Task::Update {
                op: BitOp::Set,
                repeat: set,
            },
            Task::Update {
                op: BitOp::Flip,
                repeat: flip,
            },
            Task::Update {
                op: BitOp::Clear,
                repeat: clear,
            },
            Task::Get { repeat: get },
        ]
    }

    /// Every (task, bit) pair of one iteration, phase by phase unless shuffled.
    fn tasks(self, bits: usize, shuffle: Option<u64>) -> Vec<(Task, usize)> {
        let mut tasks: Vec<_> = self
            .phases()
            .into_iter()
            .flat_map(|task| (0..bits).map(move |bit| (task, bit)))
            .collect();

        if let Some(seed) = shuffle {
            let mut rng = StdRng::seed_from_u64(seed);
            tasks.shuffle(&mut rng);
        }
        tasks
    }
}

pub struct BenchConfig {
    pub workload: Workload,
    /// Bits touched per iteration; the bitset holds one more.
    pub bits: usize,
    pub iterations: usize,
    /// Worker threads, 0 for one per core.
    pub threads: usize,
    /// Seed for randomising submission order.
    pub shuffle: Option<u64>,
}

/// Runs the configured iterations for one strategy and returns total ops.
pub fn bench_strategy(
    strategy: Strategy,
    config: &BenchConfig,
    pool: &rayon::ThreadPool,
    stats: &mut LatencyStats,
) -> Result<usize> {
    let tasks = config.workload.tasks(config.bits, config.shuffle);
    let ops_per_iteration: usize = tasks.iter().map(|(task, _)| task.ops()).sum();

    for iteration in 0..config.iterations {
        let bitset = AnyBitSet::new(strategy, config.bits + 1)?;

        let start = Instant::now();
        pool.install(|| {
            tasks
                .par_iter()
                .try_for_each(|&(task, bit)| task.run(&bitset, bit))
        })
        .with_context(|| format!("{} iteration {} failed", strategy, iteration))?;
        let nanos = start.elapsed().as_nanos() as u64;

        debug!(%strategy, iteration, elapsed = %format_nanos(nanos as f64), "iteration done");
        stats.update(nanos);
    }

    Ok(ops_per_iteration * config.iterations)
}

pub fn run_benchmark(strategies: &[Strategy], config: &BenchConfig) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .context("failed to build worker pool")?;

    info!(
        workload = ?config.workload,
        bits = config.bits,
        iterations = config.iterations,
        threads = pool.current_num_threads(),
        shuffled = config.shuffle.is_some(),
        "starting benchmark"
    );

    for &strategy in strategies {
        println!("\n{} ({:?})", strategy, config.workload);

        // 1ms buckets; iterations over 100k bits land in the tens of ms.
        let mut stats = LatencyStats::new(1_000_000);
        let start = Instant::now();
        let ops = bench_strategy(strategy, config, &pool, &mut stats)?;
        let seconds = start.elapsed().as_secs_f64();

        println!("Ops:        {}", ops);
        println!("Throughput: {:.2} ops/s", ops as f64 / seconds);
        stats.print_report();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_counts() {
        let ops: usize = Workload::UpdateMany.phases().iter().map(|t| t.ops()).sum();
        assert_eq!(ops, 18);
        let ops: usize = Workload::ReadMany.phases().iter().map(|t| t.ops()).sum();
        assert_eq!(ops, 9);
    }

    #[test]
    fn test_tasks_cover_every_bit() {
        let tasks = Workload::UpdateAndGetOnce.tasks(10, None);
        assert_eq!(tasks.len(), 40);
        assert_eq!(tasks[0], (Task::Update { op: BitOp::Set, repeat: 1 }, 0));
        assert_eq!(tasks[39], (Task::Get { repeat: 1 }, 9));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let a = Workload::ReadMany.tasks(50, Some(7));
        let b = Workload::ReadMany.tasks(50, Some(7));
        assert_eq!(a, b);
        assert_ne!(a, Workload::ReadMany.tasks(50, None));
    }

    #[test]
    fn test_bench_strategy_counts_ops() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();
        let config = BenchConfig {
            workload: Workload::UpdateAndGetOnce,
            bits: 200,
            iterations: 3,
            threads: 2,
            shuffle: Some(1),
        };

        for strategy in Strategy::SYNCHRONIZED {
            let mut stats = LatencyStats::new(1_000);
            let ops = bench_strategy(strategy, &config, &pool, &mut stats).unwrap();
            assert_eq!(ops, 200 * 4 * 3);
            assert_eq!(stats.count, 3);
        }
    }
}
