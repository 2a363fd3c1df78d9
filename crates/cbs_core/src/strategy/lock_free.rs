//! Lock-free bitset over packed atomic words.

use crate::bitset::ConcurrentBitSet;
use crate::index::{BitAddress, check_capacity, check_index, word_count};
use crate::storage::PackedStorage;
use crate::word::{BitOp, Word};
use crate::Result;
use tracing::debug;

/// Bitset mutated through compare-and-swap on individual words.
///
/// Reads are single acquire loads. Writes run the optimistic retry loop in
/// [`PackedStorage::update`]: they never block or park the thread, but a
/// writer that keeps losing races on a hot word can spin without bound.
///
/// The default word is a byte. Any `Word` no wider than the native atomic
/// width works; wider words mean fewer cells but more writers per cell.
pub struct LockFreeBitSet<W: Word = u8> {
    storage: PackedStorage<W>,
    capacity: usize,
}

impl<W: Word> LockFreeBitSet<W> {
    pub fn new(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        let len = word_count::<W>(capacity);
        debug!(capacity, words = len, word_bits = W::BITS, "created lock-free bitset");

        Ok(Self {
            storage: PackedStorage::new(len),
            capacity,
        })
    }

    pub fn word_count(&self) -> usize {
        self.storage.len()
    }
}

impl<W: Word> ConcurrentBitSet for LockFreeBitSet<W> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn get(&self, bit_index: usize) -> Result<bool> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        Ok(addr.is_set_in(self.storage.load(addr.word)))
    }

    #[inline]
    fn update(&self, bit_index: usize, op: BitOp) -> Result<()> {
        check_index(bit_index, self.capacity)?;
        let addr = BitAddress::locate::<W>(bit_index);
        let mask = addr.mask::<W>();
        self.storage.update(addr.word, |word| op.apply(word, mask));
        Ok(())
    }

    fn count_ones(&self) -> Result<usize> {
        Ok((0..self.storage.len())
            .map(|word| self.storage.load(word).count_ones() as usize)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitSetError;
    use std::thread;

    #[test]
    fn test_byte_words() {
        let bitset = LockFreeBitSet::<u8>::new(17).unwrap();
        assert_eq!(bitset.word_count(), 3);

        bitset.set(16).unwrap();
        assert!(bitset.get(16).unwrap());
        assert_eq!(
            bitset.get(17),
            Err(BitSetError::IndexOutOfRange {
                index: 17,
                capacity: 17
            })
        );
    }

    #[test]
    fn test_wide_words() {
        let bitset = LockFreeBitSet::<u64>::new(200).unwrap();
        assert_eq!(bitset.word_count(), 4);
        bitset.flip(199).unwrap();
        bitset.flip(0).unwrap();
        assert_eq!(bitset.count_ones().unwrap(), 2);
    }

    #[test]
    fn test_same_byte_writers() {
        // Eight threads, one bit each, all in the same byte.
        let bitset = LockFreeBitSet::<u8>::new(8).unwrap();

        for _ in 0..100 {
            thread::scope(|s| {
                for bit in 0..8 {
                    let bitset = &bitset;
                    s.spawn(move || bitset.set(bit).unwrap());
                }
            });
            assert_eq!(bitset.count_ones().unwrap(), 8);

            thread::scope(|s| {
                for bit in 0..8 {
                    let bitset = &bitset;
                    s.spawn(move || bitset.clear(bit).unwrap());
                }
            });
            assert_eq!(bitset.count_ones().unwrap(), 0);
        }
    }

    #[test]
    fn test_racing_flips_cancel_out() {
        let bitset = LockFreeBitSet::<u8>::new(8).unwrap();

        thread::scope(|s| {
            s.spawn(|| bitset.flip(3).unwrap());
            s.spawn(|| bitset.flip(3).unwrap());
        });

        assert!(!bitset.get(3).unwrap());
    }
}
