//! Reader/writer stress run.
//!
//! Readers loop `get` over every bit while writers loop `set` over every bit.
//! Once all writers are done, every bit must be set.

use anyhow::{Result, anyhow, bail};
use cbs_core::{AnyBitSet, ConcurrentBitSet, Strategy};
use std::thread;
use std::time::Instant;
use tracing::{error, info};

pub struct StressConfig {
    pub readers: usize,
    pub writers: usize,
    /// How many times each reader scans the whole bitset.
    pub passes: usize,
}

/// Outcome of one strategy/capacity combination.
#[derive(Debug)]
pub struct StressOutcome {
    pub reads: usize,
    pub writes: usize,
    pub set_bits: usize,
    pub elapsed_secs: f64,
}

pub fn stress_once(
    strategy: Strategy,
    capacity: usize,
    config: &StressConfig,
) -> Result<StressOutcome> {
    let bitset = AnyBitSet::new(strategy, capacity)?;
    let passes = config.passes;
    let start = Instant::now();

    let (reads, writes) = thread::scope(|s| -> Result<(usize, usize)> {
        let readers: Vec<_> = (0..config.readers)
            .map(|_| {
                let bitset = &bitset;
                s.spawn(move || -> cbs_core::Result<usize> {
                    let mut reads = 0;
                    for _ in 0..passes {
                        for i in 0..capacity {
                            std::hint::black_box(bitset.get(i)?);
                            reads += 1;
                        }
                    }
                    Ok(reads)
                })
            })
            .collect();

        let writers: Vec<_> = (0..config.writers)
            .map(|w| {
                let bitset = &bitset;
                s.spawn(move || -> cbs_core::Result<usize> {
                    // Stagger start offsets so writers overlap on words.
                    for step in 0..capacity {
                        bitset.set((step + w) % capacity)?;
                    }
                    Ok(capacity)
                })
            })
            .collect();

        let mut totals = (0, 0);
        for handle in readers {
            totals.0 += handle.join().map_err(|_| anyhow!("reader panicked"))??;
        }
        for handle in writers {
            totals.1 += handle.join().map_err(|_| anyhow!("writer panicked"))??;
        }
        Ok(totals)
    })?;

    Ok(StressOutcome {
        reads,
        writes,
        set_bits: bitset.count_ones()?,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

pub fn run_stress(strategies: &[Strategy], capacities: &[usize], config: &StressConfig) -> Result<()> {
    info!(
        readers = config.readers,
        writers = config.writers,
        passes = config.passes,
        "starting stress run"
    );

    println!(
        "{:<16} {:>8} {:>12} {:>10} {:>10} {:>10}",
        "strategy", "bits", "reads", "writes", "set", "time"
    );

    let mut failures = 0;
    for &strategy in strategies {
        for &capacity in capacities {
            let outcome = stress_once(strategy, capacity, config)?;
            println!(
                "{:<16} {:>8} {:>12} {:>10} {:>10} {:>9.4}s",
                strategy.name(),
                capacity,
                outcome.reads,
                outcome.writes,
                outcome.set_bits,
                outcome.elapsed_secs
            );

            if outcome.set_bits != capacity {
                error!(
                    %strategy,
                    capacity,
                    set = outcome.set_bits,
                    "writers finished but bits are missing"
                );
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} stress run(s) ended with missing bits", failures);
    }
    Ok(())
}
