//! Lost-update demonstration.
//!
//! Two threads hammer neighbouring bits that live in the same storage word.
//! Each thread finishes by setting its bit, so after both join both bits must
//! be set. A strategy without atomic read-modify-write can drop one of them.

use anyhow::{Result, anyhow, bail};
use cbs_core::{AnyBitSet, ConcurrentBitSet, Strategy};
use std::sync::Barrier;
use std::thread;
use tracing::{info, warn};

/// Bits 1 and 2 share a word for every supported word width.
const RACE_BITS: [usize; 2] = [1, 2];
const RACE_CAPACITY: usize = 10;

/// Runs one round and reports whether either final `set` was lost.
pub fn race_round(strategy: Strategy, burst: usize) -> Result<bool> {
    let bitset = AnyBitSet::new(strategy, RACE_CAPACITY)?;
    let barrier = Barrier::new(RACE_BITS.len());

    thread::scope(|s| -> Result<()> {
        let handles: Vec<_> = RACE_BITS
            .iter()
            .map(|&bit| {
                let (bitset, barrier) = (&bitset, &barrier);
                s.spawn(move || -> cbs_core::Result<()> {
                    barrier.wait();
                    for _ in 0..burst {
                        bitset.set(bit)?;
                        bitset.clear(bit)?;
                    }
                    bitset.set(bit)
                })
            })
            .collect();

        for handle in handles {
            handle.join().map_err(|_| anyhow!("racer panicked"))??;
        }
        Ok(())
    })?;

    for bit in RACE_BITS {
        if !bitset.get(bit)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn run_race(strategies: &[Strategy], rounds: usize, burst: usize) -> Result<()> {
    info!(rounds, burst, "starting lost-update race");
    println!("{:<16} {:>8} {:>8}", "strategy", "rounds", "lost");

    let mut broken = Vec::new();
    for &strategy in strategies {
        if !strategy.is_synchronized() {
            warn!(%strategy, "baseline without atomic read-modify-write, lost updates expected");
        }

        let mut lost = 0;
        for _ in 0..rounds {
            if race_round(strategy, burst)? {
                lost += 1;
            }
        }
        println!("{:<16} {:>8} {:>8}", strategy.name(), rounds, lost);

        if lost > 0 && strategy.is_synchronized() {
            broken.push(strategy);
        }
    }

    if !broken.is_empty() {
        bail!("synchronized strategies lost updates: {:?}", broken);
    }
    Ok(())
}
