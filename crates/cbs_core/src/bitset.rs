//! The four-operation contract shared by every strategy.

use crate::Result;
use crate::word::BitOp;

/// A fixed-capacity bitset that can be read and mutated through `&self` from
/// many threads at once.
///
/// Implementors supply `get` and `update`; `set`, `clear` and `flip` are
/// defined here once in terms of `update`. Every method validates the index
/// before touching storage, so an out-of-range call never blocks.
///
/// Mutations of one word are totally ordered. Nothing is promised about the
/// relative order of operations on different words.
pub trait ConcurrentBitSet: Send + Sync {
    /// Number of addressable bits, fixed at construction.
    fn capacity(&self) -> usize;

    /// Returns whether the bit at `bit_index` is set.
    fn get(&self, bit_index: usize) -> Result<bool>;

    /// Applies `op` to the bit at `bit_index` as a single step on its word.
    fn update(&self, bit_index: usize, op: BitOp) -> Result<()>;

    /// Sets the bit to 1. Idempotent.
    #[inline]
    fn set(&self, bit_index: usize) -> Result<()> {
        self.update(bit_index, BitOp::Set)
    }

    /// Sets the bit to 0. Idempotent.
    #[inline]
    fn clear(&self, bit_index: usize) -> Result<()> {
        self.update(bit_index, BitOp::Clear)
    }

    /// Toggles the bit.
    ///
    /// Two racing flips of the same bit both take effect and cancel out.
    #[inline]
    fn flip(&self, bit_index: usize) -> Result<()> {
        self.update(bit_index, BitOp::Flip)
    }

    /// Number of set bits.
    ///
    /// Reads each bit independently; under concurrent mutation the result is
    /// not a snapshot of any single moment.
    fn count_ones(&self) -> Result<usize> {
        let mut count = 0;
        for bit_index in 0..self.capacity() {
            if self.get(bit_index)? {
                count += 1;
            }
        }
        Ok(count)
    }
}
