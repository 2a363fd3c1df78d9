//! Lock striping: one reader-writer lock per word.

use crate::bitset::ConcurrentBitSet;
use crate::index::{BitAddress, check_capacity, check_index, word_count};
use crate::word::{BitOp, Word};
use crate::{BitSetError, Result};
use std::sync::RwLock;
use tracing::debug;

/// Bitset with an independent reader-writer lock around every word.
///
/// Each lock owns exactly the word it guards, so the number of locks always
/// equals the number of words. Operations on different words never contend.
pub struct StripedRwLockBitSet<W: Word = u64> {
    stripes: Box<[RwLock<W>]>,
    capacity: usize,
}

impl<W: Word> StripedRwLockBitSet<W> {
    pub fn new(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        let len = word_count::<W>(capacity);
        debug!(capacity, locks = len, word_bits = W::BITS, "created striped rw-lock bitset");

        Ok(Self {
            stripes: (0..len).map(|_| RwLock::new(W::ZERO)).collect(),
            capacity,
        })
    }

    /// Number of locks, one per word.
    pub fn lock_count(&self) -> usize {
        self.stripes.len()
    }
}

impl<W: Word> ConcurrentBitSet for StripedRwLockBitSet<W> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn get(&self, bit_index: usize) -> Result<bool> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let word = self.stripes[addr.word]
            .read()
            .map_err(|_| BitSetError::LockPoisoned)?;
        Ok(addr.is_set_in(*word))
    }

    fn update(&self, bit_index: usize, op: BitOp) -> Result<()> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let mut word = self.stripes[addr.word]
            .write()
            .map_err(|_| BitSetError::LockPoisoned)?;
        *word = op.apply(*word, addr.mask());
        Ok(())
    }

    fn count_ones(&self) -> Result<usize> {
        let mut count = 0;
        for stripe in self.stripes.iter() {
            let word = stripe.read().map_err(|_| BitSetError::LockPoisoned)?;
            count += word.count_ones() as usize;
        }
        Ok(count)
    }
}
