//! Whole-structure mutual exclusion.

use crate::bitset::ConcurrentBitSet;
use crate::index::{BitAddress, check_capacity, check_index, word_count};
use crate::word::{BitOp, Word};
use crate::{BitSetError, Result};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Bitset serialised by one mutex.
///
/// At most one operation is in flight at any time, whichever bit it
/// addresses. Readers exclude each other as well as writers.
pub struct FullMutexBitSet<W: Word = u64> {
    words: Mutex<Box<[W]>>,
    capacity: usize,
}

impl<W: Word> FullMutexBitSet<W> {
    pub fn new(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        let len = word_count::<W>(capacity);
        debug!(capacity, words = len, word_bits = W::BITS, "created full-mutex bitset");

        Ok(Self {
            words: Mutex::new(vec![W::ZERO; len].into_boxed_slice()),
            capacity,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<[W]>>> {
        self.words.lock().map_err(|_| BitSetError::LockPoisoned)
    }
}

impl<W: Word> ConcurrentBitSet for FullMutexBitSet<W> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn get(&self, bit_index: usize) -> Result<bool> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let words = self.lock()?;
        Ok(addr.is_set_in(words[addr.word]))
    }

    fn update(&self, bit_index: usize, op: BitOp) -> Result<()> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let mut words = self.lock()?;
        let word = &mut words[addr.word];
        *word = op.apply(*word, addr.mask());
        Ok(())
    }

    /// Counts under the single lock, so the result is a consistent snapshot.
    fn count_ones(&self) -> Result<usize> {
        let words = self.lock()?;
        Ok(words.iter().map(|w| w.count_ones() as usize).sum())
    }
}
