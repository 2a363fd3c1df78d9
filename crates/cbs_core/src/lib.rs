//! Fixed-capacity bit vectors that can be mutated from many threads at once.
//!
//! This crate provides a family of concurrent bitsets sharing a single
//! four-operation contract (`get`, `set`, `clear`, `flip`). The variants differ
//! only in how they protect the packed words holding the bits: a single mutex,
//! a single reader-writer lock, one lock per word, or a lock-free
//! compare-and-swap loop over atomic words.

/// Shared index arithmetic.
///
/// Translates a global bit index into the word holding it and the offset of
/// the bit inside that word. Every strategy goes through these functions so
/// the arithmetic is defined exactly once.
pub mod index;

/// Storage word widths and the bit-level transformations applied to them.
///
/// Abstracts over `u8`, `u16`, `u32` and `u64` together with their atomic
/// counterparts, so a bitset can choose its synchronisation granularity at
/// the type level.
pub mod word;

/// Packed atomic storage and the lock-free word accessor.
///
/// Holds the zero-initialised word array and exposes acquire loads plus an
/// optimistic compare-and-swap update loop.
pub mod storage;

/// The four-operation contract shared by every concurrency strategy.
pub mod bitset;

/// Concrete concurrency strategies.
///
/// Locking variants (full mutex, global reader-writer lock, striped locks),
/// the lock-free variant and an intentionally unsynchronised baseline.
pub mod strategy;

/// Construction-time selection over the closed set of strategies.
pub mod selector;

pub use bitset::ConcurrentBitSet;
pub use selector::{AnyBitSet, Strategy};
pub use strategy::{
    FullMutexBitSet, GlobalRwLockBitSet, LockFreeBitSet, StripedMutexBitSet,
    StripedRwLockBitSet, UnsynchronizedBitSet,
};
pub use word::{BitOp, Word};

use thiserror::Error;

/// Errors returned by bitset construction and bit operations.
///
/// None of these are fatal; all are local to the failing call and the bitset
/// remains usable afterwards (except after `LockPoisoned`, where the protected
/// words may hold whatever the panicking thread left behind).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitSetError {
    /// A bitset must hold at least one bit.
    #[error("bitset capacity must be positive")]
    InvalidCapacity,

    /// The bit index does not address a bit of this bitset.
    #[error("bit index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: i64, capacity: usize },

    /// A lock guarding the words was poisoned by a panicking holder.
    #[error("lock poisoned")]
    LockPoisoned,

    /// A strategy name did not match any known strategy.
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),
}

pub type Result<T, E = BitSetError> = core::result::Result<T, E>;
