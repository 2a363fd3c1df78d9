//! Bit index decomposition and bounds checks.

use crate::word::Word;
use crate::{BitSetError, Result};

/// Location of a single bit inside packed storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitAddress {
    /// Index of the word holding the bit.
    pub word: usize,
    /// Position of the bit within that word, `0..W::BITS`.
    pub offset: usize,
}

impl BitAddress {
    #[inline(always)]
    pub fn locate<W: Word>(bit_index: usize) -> Self {
        Self {
            word: bit_index / W::BITS,
            offset: bit_index % W::BITS,
        }
    }

    /// Mask isolating this bit within its word.
    #[inline(always)]
    pub fn mask<W: Word>(&self) -> W {
        W::ONE << self.offset
    }

    /// Whether this bit is set in `word`.
    #[inline(always)]
    pub fn is_set_in<W: Word>(&self, word: W) -> bool {
        word & self.mask::<W>() != W::ZERO
    }
}

/// Number of `W` words needed to hold `capacity` bits.
#[inline]
pub fn word_count<W: Word>(capacity: usize) -> usize {
    capacity.div_ceil(W::BITS)
}

pub fn check_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(BitSetError::InvalidCapacity);
    }
    Ok(())
}

#[inline(always)]
pub fn check_index(bit_index: usize, capacity: usize) -> Result<()> {
    if bit_index >= capacity {
        return Err(BitSetError::IndexOutOfRange {
            index: i64::try_from(bit_index).unwrap_or(i64::MAX),
            capacity,
        });
    }
    Ok(())
}

/// Converts a signed index supplied from outside the library.
///
/// Negative indices never address a bit. `capacity` is only used to fill in
/// the error; the upper bound is still checked by the bitset itself.
pub fn bit_index_from_signed(bit_index: i64, capacity: usize) -> Result<usize> {
    usize::try_from(bit_index).map_err(|_| BitSetError::IndexOutOfRange {
        index: bit_index,
        capacity,
    })
}
