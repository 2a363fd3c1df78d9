use cbs_core::{AnyBitSet, BitSetError, ConcurrentBitSet, LockFreeBitSet, Strategy};
use std::thread;

fn fresh(strategy: Strategy, capacity: usize) -> AnyBitSet {
    AnyBitSet::new(strategy, capacity).unwrap()
}

#[test]
fn test_set_then_get() {
    for strategy in Strategy::SYNCHRONIZED {
        let bitset = fresh(strategy, 100);
        for i in 0..100 {
            bitset.set(i).unwrap();
            assert!(bitset.get(i).unwrap(), "{strategy}: bit {i}");
        }
    }
}

#[test]
fn test_round_trips() {
    for strategy in Strategy::SYNCHRONIZED {
        let bitset = fresh(strategy, 70);
        for i in [0, 1, 7, 8, 63, 64, 69] {
            bitset.set(i).unwrap();
            bitset.clear(i).unwrap();
            assert!(!bitset.get(i).unwrap(), "{strategy}: set/clear {i}");

            bitset.clear(i).unwrap();
            bitset.set(i).unwrap();
            assert!(bitset.get(i).unwrap(), "{strategy}: clear/set {i}");

            bitset.flip(i).unwrap();
            bitset.flip(i).unwrap();
            assert!(bitset.get(i).unwrap(), "{strategy}: double flip {i}");
        }
    }
}

#[test]
fn test_set_does_not_touch_neighbours() {
    for strategy in Strategy::SYNCHRONIZED {
        let bitset = fresh(strategy, 130);
        bitset.set(65).unwrap();
        for j in (0..130).filter(|&j| j != 65) {
            assert!(!bitset.get(j).unwrap(), "{strategy}: bit {j} leaked");
        }
    }
}

#[test]
fn test_boundaries() {
    for strategy in Strategy::ALL {
        let capacity = 37;
        let bitset = fresh(strategy, capacity);

        bitset.set(0).unwrap();
        bitset.set(capacity - 1).unwrap();
        assert!(bitset.get(0).unwrap());
        assert!(bitset.get(capacity - 1).unwrap());

        let out_of_range = Err(BitSetError::IndexOutOfRange {
            index: capacity as i64,
            capacity,
        });
        assert_eq!(bitset.get(capacity), out_of_range);
        assert_eq!(bitset.set(capacity), out_of_range.clone().map(|_| ()));
        assert_eq!(bitset.clear(capacity), out_of_range.clone().map(|_| ()));
        assert_eq!(bitset.flip(capacity), out_of_range.map(|_| ()));
        assert!(bitset.get(usize::MAX).is_err());
    }
}

#[test]
fn test_negative_index_is_rejected() {
    let bitset = fresh(Strategy::LockFree, 10);
    let err = cbs_core::index::bit_index_from_signed(-1, bitset.capacity()).unwrap_err();
    assert_eq!(
        err,
        BitSetError::IndexOutOfRange {
            index: -1,
            capacity: 10
        }
    );
}

#[test]
fn test_two_writers_on_one_word() {
    // Bits 1 and 2 share a word under every word width.
    for strategy in Strategy::SYNCHRONIZED {
        for _ in 0..1000 {
            let bitset = fresh(strategy, 10);
            thread::scope(|s| {
                s.spawn(|| bitset.set(1).unwrap());
                s.spawn(|| bitset.set(2).unwrap());
            });
            assert!(
                bitset.get(1).unwrap() && bitset.get(2).unwrap(),
                "{strategy} lost an update"
            );
        }
    }
}

#[test]
fn test_readers_and_writers_stress() {
    const READERS: usize = 4;
    const WRITERS: usize = 4;

    for strategy in Strategy::SYNCHRONIZED {
        for capacity in [10, 100, 1000] {
            let bitset = fresh(strategy, capacity);

            thread::scope(|s| {
                for _ in 0..READERS {
                    s.spawn(|| {
                        for _ in 0..10 {
                            for i in 0..capacity {
                                bitset.get(i).unwrap();
                            }
                        }
                    });
                }
                for w in 0..WRITERS {
                    let bitset = &bitset;
                    s.spawn(move || {
                        // Writers start at different offsets to overlap on words.
                        for step in 0..capacity {
                            bitset.set((step + w * 3) % capacity).unwrap();
                        }
                    });
                }
            });

            assert_eq!(
                bitset.count_ones().unwrap(),
                capacity,
                "{strategy} at capacity {capacity}"
            );
            assert!((0..capacity).all(|i| bitset.get(i).unwrap()));
        }
    }
}

#[test]
fn test_parallel_flip_inverts_everything() {
    for strategy in Strategy::SYNCHRONIZED {
        let capacity = 500;
        let bitset = fresh(strategy, capacity);
        let preset: Vec<usize> = (0..capacity).filter(|i| i % 7 == 0).collect();
        for &i in &preset {
            bitset.set(i).unwrap();
        }

        let indices: Vec<usize> = (0..capacity).collect();
        thread::scope(|s| {
            for chunk in indices.chunks(64) {
                let bitset = &bitset;
                s.spawn(move || {
                    for &i in chunk {
                        bitset.flip(i).unwrap();
                    }
                });
            }
        });

        for i in 0..capacity {
            assert_eq!(bitset.get(i).unwrap(), i % 7 != 0, "{strategy}: bit {i}");
        }
    }
}

#[test]
fn test_lock_free_word_widths() {
    fn hammer<B: ConcurrentBitSet>(bitset: &B) {
        let capacity = bitset.capacity();
        thread::scope(|s| {
            for t in 0..8 {
                s.spawn(move || {
                    for i in (t..capacity).step_by(8) {
                        bitset.set(i).unwrap();
                    }
                });
            }
        });
        assert_eq!(bitset.count_ones().unwrap(), capacity);
    }

    hammer(&LockFreeBitSet::<u8>::new(333).unwrap());
    hammer(&LockFreeBitSet::<u16>::new(333).unwrap());
    hammer(&LockFreeBitSet::<u32>::new(333).unwrap());
    hammer(&LockFreeBitSet::<u64>::new(333).unwrap());
}
