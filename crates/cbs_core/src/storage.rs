//! Packed atomic word storage.
//!
//! `PackedStorage` knows nothing about individual bits: it hands out whole
//! words with acquire loads and replaces whole words through an optimistic
//! compare-and-swap loop. Bit semantics live in the callers.

use crate::word::Word;
use core::sync::atomic::Ordering;

/// Fixed-length, zero-initialised array of atomic words.
pub struct PackedStorage<W: Word> {
    words: Box<[W::Atomic]>,
}

impl<W: Word> PackedStorage<W> {
    pub fn new(len: usize) -> Self {
        Self {
            words: (0..len).map(|_| W::new_atomic(W::ZERO)).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the latest completed write to `word`.
    ///
    /// Acquire ordering pairs with the release half of `update`, so anything
    /// written before a successful update is visible after observing it.
    ///
    /// # Panics
    ///
    /// Panics if `word >= self.len()`.
    #[inline(always)]
    pub fn load(&self, word: usize) -> W {
        W::load(&self.words[word], Ordering::Acquire)
    }

    /// Replaces `word` with `transform(current)` as a single atomic step.
    ///
    /// Reads the current value, computes the candidate and tries to commit it
    /// with a compare-and-swap. If another thread committed first, the value
    /// it left behind becomes the new input and the loop goes again. The
    /// compare key is the whole word value, so every committed transform saw
    /// its true predecessor and no update is lost. There is no retry cap: a
    /// thread can spin for as long as it keeps losing the race.
    ///
    /// Returns the value that was replaced.
    ///
    /// # Panics
    ///
    /// Panics if `word >= self.len()`.
    #[inline(always)]
    pub fn update<F>(&self, word: usize, transform: F) -> W
    where
        F: Fn(W) -> W,
    {
        let cell = &self.words[word];
        let mut current = W::load(cell, Ordering::Acquire);
        loop {
            let new = transform(current);
            match W::compare_exchange_weak(cell, current, new, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(previous) => return previous,
                Err(actual) => {
                    current = actual;
                    core::hint::spin_loop();
                }
            }
        }
    }

    /// Overwrites `word` without checking what it held.
    ///
    /// Combined with a separate `load` this is a non-atomic read-modify-write
    /// and loses concurrent updates. Only the unsynchronised baseline uses it.
    #[inline(always)]
    pub fn store_racy(&self, word: usize, value: W) {
        W::store(&self.words[word], value, Ordering::Release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_zero_initialised() {
        let storage = PackedStorage::<u8>::new(4);
        assert_eq!(storage.len(), 4);
        for word in 0..4 {
            assert_eq!(storage.load(word), 0);
        }
    }

    #[test]
    fn test_update_returns_previous() {
        let storage = PackedStorage::<u32>::new(2);
        assert_eq!(storage.update(1, |w| w | 0b101), 0);
        assert_eq!(storage.update(1, |w| w ^ 0b001), 0b101);
        assert_eq!(storage.load(1), 0b100);
        assert_eq!(storage.load(0), 0);
    }

    #[test]
    #[should_panic]
    fn test_load_out_of_range() {
        let storage = PackedStorage::<u8>::new(1);
        storage.load(1);
    }

    #[test]
    fn test_store_racy() {
        let storage = PackedStorage::<u16>::new(1);
        storage.store_racy(0, 0xBEEF);
        assert_eq!(storage.load(0), 0xBEEF);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        // Each thread owns one bit of the same byte and toggles it an even
        // number of times before finally setting it.
        let storage = PackedStorage::<u8>::new(1);

        thread::scope(|s| {
            for bit in 0..8 {
                let storage = &storage;
                s.spawn(move || {
                    let mask = 1u8 << bit;
                    for _ in 0..10_000 {
                        storage.update(0, |w| w ^ mask);
                    }
                    storage.update(0, |w| w | mask);
                });
            }
        });

        assert_eq!(storage.load(0), 0xFF);
    }
}
