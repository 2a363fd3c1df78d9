//! Intentionally broken baseline without read-modify-write atomicity.

use crate::bitset::ConcurrentBitSet;
use crate::index::{BitAddress, check_capacity, check_index, word_count};
use crate::storage::PackedStorage;
use crate::word::{BitOp, Word};
use crate::Result;
use tracing::debug;

/// Bitset whose writes are a separate load and store.
///
/// Memory-safe, because every access is still an atomic load or store, but
/// two writers hitting the same word can overwrite each other's bit: both
/// read the old word, each ORs in its own bit, and the later store wins.
/// Used only to show what the synchronised strategies prevent.
pub struct UnsynchronizedBitSet<W: Word = u8> {
    storage: PackedStorage<W>,
    capacity: usize,
}

impl<W: Word> UnsynchronizedBitSet<W> {
    pub fn new(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        let len = word_count::<W>(capacity);
        debug!(capacity, words = len, word_bits = W::BITS, "created unsynchronized bitset");

        Ok(Self {
            storage: PackedStorage::new(len),
            capacity,
        })
    }
}

impl<W: Word> ConcurrentBitSet for UnsynchronizedBitSet<W> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn get(&self, bit_index: usize) -> Result<bool> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        Ok(addr.is_set_in(self.storage.load(addr.word)))
    }

    fn update(&self, bit_index: usize, op: BitOp) -> Result<()> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let current = self.storage.load(addr.word);
        self.storage
            .store_racy(addr.word, op.apply(current, addr.mask()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_thread_is_correct() {
        let bitset = UnsynchronizedBitSet::<u8>::new(10).unwrap();
        bitset.set(1).unwrap();
        bitset.set(2).unwrap();
        bitset.flip(9).unwrap();
        bitset.clear(1).unwrap();

        assert!(!bitset.get(1).unwrap());
        assert!(bitset.get(2).unwrap());
        assert!(bitset.get(9).unwrap());
        assert_eq!(bitset.count_ones().unwrap(), 2);
    }
}
