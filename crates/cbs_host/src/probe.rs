//! Single-bit probes from the command line.
//!
//! Indices arrive signed so that a negative index reaches the library's
//! bounds check and is reported instead of being rejected by the parser.

use anyhow::{Context, Result, bail};
use cbs_core::index::bit_index_from_signed;
use cbs_core::{AnyBitSet, BitOp, ConcurrentBitSet, Strategy};
use core::fmt;
use core::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Get,
    Update(BitOp),
}

/// One `op:index` step, e.g. `set:3` or `get:-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOp {
    pub kind: ProbeKind,
    pub index: i64,
}

impl FromStr for ProbeOp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((op, index)) = s.split_once(':') else {
            bail!("expected `op:index`, got `{}`", s);
        };

        let kind = match op.trim().to_ascii_lowercase().as_str() {
            "get" => ProbeKind::Get,
            "set" => ProbeKind::Update(BitOp::Set),
            "clear" => ProbeKind::Update(BitOp::Clear),
            "flip" => ProbeKind::Update(BitOp::Flip),
            other => bail!("unknown operation `{}`", other),
        };
        let index = index
            .trim()
            .parse()
            .with_context(|| format!("invalid bit index `{}`", index))?;

        Ok(Self { kind, index })
    }
}

impl fmt::Display for ProbeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProbeKind::Get => write!(f, "get:{}", self.index),
            ProbeKind::Update(op) => write!(f, "{}:{}", op, self.index),
        }
    }
}

/// Applies `op` and returns what to print: the bit value for reads, `ok`
/// for updates.
pub fn apply(bitset: &AnyBitSet, op: ProbeOp) -> cbs_core::Result<String> {
    let bit_index = bit_index_from_signed(op.index, bitset.capacity())?;
    match op.kind {
        ProbeKind::Get => Ok(u8::from(bitset.get(bit_index)?).to_string()),
        ProbeKind::Update(bit_op) => {
            bitset.update(bit_index, bit_op)?;
            Ok("ok".to_string())
        }
    }
}

pub fn run_probe(strategy: Strategy, capacity: usize, ops: &[ProbeOp]) -> Result<()> {
    let bitset = AnyBitSet::new(strategy, capacity)
        .with_context(|| format!("cannot build {} bitset", strategy))?;

    for &op in ops {
        let outcome = apply(&bitset, op).with_context(|| format!("{} failed", op))?;
        println!("{:<12} {}", op.to_string(), outcome);
    }
    Ok(())
}
