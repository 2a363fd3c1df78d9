//! Lock striping with plain mutexes.

use crate::bitset::ConcurrentBitSet;
use crate::index::{BitAddress, check_capacity, check_index, word_count};
use crate::word::{BitOp, Word};
use crate::{BitSetError, Result};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Bitset with one mutex per word.
///
/// Same partitioning as `StripedRwLockBitSet`, but readers of a word exclude
/// each other too. Cheaper to acquire than a reader-writer lock when reads
/// do not dominate.
pub struct StripedMutexBitSet<W: Word = u64> {
    stripes: Box<[Mutex<W>]>,
    capacity: usize,
}

impl<W: Word> StripedMutexBitSet<W> {
    pub fn new(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        let len = word_count::<W>(capacity);
        debug!(capacity, locks = len, word_bits = W::BITS, "created striped mutex bitset");

        Ok(Self {
            stripes: (0..len).map(|_| Mutex::new(W::ZERO)).collect(),
            capacity,
        })
    }

    pub fn lock_count(&self) -> usize {
        self.stripes.len()
    }

    fn lock(&self, word: usize) -> Result<MutexGuard<'_, W>> {
        self.stripes[word]
            .lock()
            .map_err(|_| BitSetError::LockPoisoned)
    }
}

impl<W: Word> ConcurrentBitSet for StripedMutexBitSet<W> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn get(&self, bit_index: usize) -> Result<bool> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let word = self.lock(addr.word)?;
        Ok(addr.is_set_in(*word))
    }

    fn update(&self, bit_index: usize, op: BitOp) -> Result<()> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let mut word = self.lock(addr.word)?;
        *word = op.apply(*word, addr.mask());
        Ok(())
    }

    fn count_ones(&self) -> Result<usize> {
        let mut count = 0;
        for word in 0..self.stripes.len() {
            count += self.lock(word)?.count_ones() as usize;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_per_word() {
        assert_eq!(StripedMutexBitSet::<u64>::new(100_001).unwrap().lock_count(), 1563);
        assert_eq!(StripedMutexBitSet::<u16>::new(17).unwrap().lock_count(), 2);
    }

    #[test]
    fn test_neighbouring_bits_are_independent() {
        let bitset = StripedMutexBitSet::<u64>::new(64).unwrap();
        bitset.set(1).unwrap();
        bitset.set(2).unwrap();
        bitset.clear(1).unwrap();
        assert!(!bitset.get(1).unwrap());
        assert!(bitset.get(2).unwrap());
        assert_eq!(bitset.count_ones().unwrap(), 1);
    }
}
