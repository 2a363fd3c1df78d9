//! Storage words and the bit-level transformations applied to them.
//!
//! A word is both the unit of storage and the unit of synchronisation. Its
//! width must never exceed what the platform can load and compare-and-swap
//! in one instruction, otherwise readers could observe a torn value.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not, Shl};
use core::sync::atomic::{AtomicU8, AtomicU16, AtomicU32, AtomicU64, Ordering};

/// An unsigned integer usable as a packed storage word.
pub trait Word:
    Copy
    + Eq
    + Send
    + Sync
    + fmt::Debug
    + fmt::Binary
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<usize, Output = Self>
    + 'static
{
    /// Atomic cell with the same width as `Self`.
    type Atomic: Send + Sync;

    /// Number of bits held by one word.
    const BITS: usize;
    const ZERO: Self;
    const ONE: Self;

    fn new_atomic(value: Self) -> Self::Atomic;

    fn load(atomic: &Self::Atomic, order: Ordering) -> Self;

    fn store(atomic: &Self::Atomic, value: Self, order: Ordering);

    fn compare_exchange_weak(
        atomic: &Self::Atomic,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;

    /// Number of set bits in the word.
    fn count_ones(self) -> u32;
}

macro_rules! impl_word {
    ($ty:ty, $atomic:ty) => {
        impl Word for $ty {
            type Atomic = $atomic;

            const BITS: usize = <$ty>::BITS as usize;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline(always)]
            fn new_atomic(value: Self) -> Self::Atomic {
                <$atomic>::new(value)
            }

            #[inline(always)]
            fn load(atomic: &Self::Atomic, order: Ordering) -> Self {
                atomic.load(order)
            }

            #[inline(always)]
            fn store(atomic: &Self::Atomic, value: Self, order: Ordering) {
                atomic.store(value, order)
            }

            #[inline(always)]
            fn compare_exchange_weak(
                atomic: &Self::Atomic,
                current: Self,
                new: Self,
                success: Ordering,
                failure: Ordering,
            ) -> Result<Self, Self> {
                atomic.compare_exchange_weak(current, new, success, failure)
            }

            #[inline(always)]
            fn count_ones(self) -> u32 {
                <$ty>::count_ones(self)
            }
        }
    };
}

impl_word!(u8, AtomicU8);
impl_word!(u16, AtomicU16);
impl_word!(u32, AtomicU32);
impl_word!(u64, AtomicU64);

/// A single-bit mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    /// OR the mask in.
    Set,
    /// AND with the inverted mask.
    Clear,
    /// XOR the mask in.
    Flip,
}

impl BitOp {
    /// Applies the mutation to `word`, touching only the bits selected by `mask`.
    #[inline(always)]
    pub fn apply<W: Word>(self, word: W, mask: W) -> W {
        match self {
            BitOp::Set => word | mask,
            BitOp::Clear => word & !mask,
            BitOp::Flip => word ^ mask,
        }
    }
}

impl fmt::Display for BitOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitOp::Set => f.write_str("set"),
            BitOp::Clear => f.write_str("clear"),
            BitOp::Flip => f.write_str("flip"),
        }
    }
}
