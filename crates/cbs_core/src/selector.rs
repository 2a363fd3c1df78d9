//! Choosing a strategy at construction time.

use crate::bitset::ConcurrentBitSet;
use crate::strategy::{
    FullMutexBitSet, GlobalRwLockBitSet, LockFreeBitSet, StripedMutexBitSet, StripedRwLockBitSet,
    UnsynchronizedBitSet,
};
use crate::word::BitOp;
use crate::{BitSetError, Result};
use core::fmt;
use core::str::FromStr;

/// The closed set of concurrency strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    FullMutex,
    GlobalRwLock,
    StripedRwLock,
    StripedMutex,
    LockFree,
    /// Loses concurrent updates. Not part of [`Strategy::SYNCHRONIZED`].
    Unsynchronized,
}

impl Strategy {
    /// Every strategy that honours the concurrent contract.
    pub const SYNCHRONIZED: [Strategy; 5] = [
        Strategy::FullMutex,
        Strategy::GlobalRwLock,
        Strategy::StripedRwLock,
        Strategy::StripedMutex,
        Strategy::LockFree,
    ];

    pub const ALL: [Strategy; 6] = [
        Strategy::FullMutex,
        Strategy::GlobalRwLock,
        Strategy::StripedRwLock,
        Strategy::StripedMutex,
        Strategy::LockFree,
        Strategy::Unsynchronized,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::FullMutex => "full-mutex",
            Strategy::GlobalRwLock => "global-rw-lock",
            Strategy::StripedRwLock => "striped-rw-lock",
            Strategy::StripedMutex => "striped-mutex",
            Strategy::LockFree => "lock-free",
            Strategy::Unsynchronized => "unsynchronized",
        }
    }

    pub fn is_synchronized(self) -> bool {
        self != Strategy::Unsynchronized
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = BitSetError;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BitSetError::UnknownStrategy(s.to_string()))
    }
}

/// A bitset built with one of the strategies, using each strategy's default
/// word width.
pub enum AnyBitSet {
    FullMutex(FullMutexBitSet),
    GlobalRwLock(GlobalRwLockBitSet),
    StripedRwLock(StripedRwLockBitSet),
    StripedMutex(StripedMutexBitSet),
    LockFree(LockFreeBitSet),
    Unsynchronized(UnsynchronizedBitSet),
}

impl AnyBitSet {
    pub fn new(strategy: Strategy, capacity: usize) -> Result<Self> {
        Ok(match strategy {
            Strategy::FullMutex => AnyBitSet::FullMutex(FullMutexBitSet::new(capacity)?),
            Strategy::GlobalRwLock => AnyBitSet::GlobalRwLock(GlobalRwLockBitSet::new(capacity)?),
            Strategy::StripedRwLock => {
                AnyBitSet::StripedRwLock(StripedRwLockBitSet::new(capacity)?)
            }
            Strategy::StripedMutex => AnyBitSet::StripedMutex(StripedMutexBitSet::new(capacity)?),
            Strategy::LockFree => AnyBitSet::LockFree(LockFreeBitSet::new(capacity)?),
            Strategy::Unsynchronized => {
                AnyBitSet::Unsynchronized(UnsynchronizedBitSet::new(capacity)?)
            }
        })
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            AnyBitSet::FullMutex(_) => Strategy::FullMutex,
            AnyBitSet::GlobalRwLock(_) => Strategy::GlobalRwLock,
            AnyBitSet::StripedRwLock(_) => Strategy::StripedRwLock,
            AnyBitSet::StripedMutex(_) => Strategy::StripedMutex,
            AnyBitSet::LockFree(_) => Strategy::LockFree,
            AnyBitSet::Unsynchronized(_) => Strategy::Unsynchronized,
        }
    }

    fn inner(&self) -> &dyn ConcurrentBitSet {
        match self {
            AnyBitSet::FullMutex(b) => b,
            AnyBitSet::GlobalRwLock(b) => b,
            AnyBitSet::StripedRwLock(b) => b,
            AnyBitSet::StripedMutex(b) => b,
            AnyBitSet::LockFree(b) => b,
            AnyBitSet::Unsynchronized(b) => b,
        }
    }
}

impl ConcurrentBitSet for AnyBitSet {
    fn capacity(&self) -> usize {
        self.inner().capacity()
    }

    fn get(&self, bit_index: usize) -> Result<bool> {
        self.inner().get(bit_index)
    }

    fn update(&self, bit_index: usize, op: BitOp) -> Result<()> {
        self.inner().update(bit_index, op)
    }

    fn count_ones(&self) -> Result<usize> {
        self.inner().count_ones()
    }
}

impl fmt::Debug for AnyBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyBitSet")
            .field("strategy", &self.strategy())
            .field("capacity", &self.capacity())
            .finish()
    }
}
