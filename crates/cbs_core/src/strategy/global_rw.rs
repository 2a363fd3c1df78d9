//! One reader-writer lock for the whole structure.

use crate::bitset::ConcurrentBitSet;
use crate::index::{BitAddress, check_capacity, check_index, word_count};
use crate::word::{BitOp, Word};
use crate::{BitSetError, Result};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Bitset guarded by a single reader-writer lock.
///
/// `get` takes the lock in shared mode, so readers run in parallel. Every
/// mutation takes it exclusively and therefore blocks all other readers and
/// writers regardless of which word they address.
pub struct GlobalRwLockBitSet<W: Word = u64> {
    words: RwLock<Box<[W]>>,
    capacity: usize,
}

impl<W: Word> GlobalRwLockBitSet<W> {
    pub fn new(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        let len = word_count::<W>(capacity);
        debug!(capacity, words = len, word_bits = W::BITS, "created global rw-lock bitset");

        Ok(Self {
            words: RwLock::new(vec![W::ZERO; len].into_boxed_slice()),
            capacity,
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Box<[W]>>> {
        self.words.read().map_err(|_| BitSetError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Box<[W]>>> {
        self.words.write().map_err(|_| BitSetError::LockPoisoned)
    }
}

impl<W: Word> ConcurrentBitSet for GlobalRwLockBitSet<W> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn get(&self, bit_index: usize) -> Result<bool> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let words = self.read()?;
        Ok(addr.is_set_in(words[addr.word]))
    }

    fn update(&self, bit_index: usize, op: BitOp) -> Result<()> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let mut words = self.write()?;
        let word = &mut words[addr.word];
        *word = op.apply(*word, addr.mask());
        Ok(())
    }

    /// Counts under one read lock; consistent with respect to all writers.
    fn count_ones(&self) -> Result<usize> {
        let words = self.read()?;
        Ok(words.iter().map(|w| w.count_ones() as usize).sum())
    }
}
