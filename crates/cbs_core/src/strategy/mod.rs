//! Concurrency strategies behind the `ConcurrentBitSet` contract.
//!
//! All variants share the index math in `crate::index` and the bit
//! transformations in `crate::word::BitOp`; they differ only in how a word is
//! protected while it is read or rewritten.

mod full_mutex;
mod global_rw;
mod lock_free;
mod striped_mutex;
mod striped_rw;
mod unsynchronized;

pub use full_mutex::FullMutexBitSet;
pub use global_rw::GlobalRwLockBitSet;
pub use lock_free::LockFreeBitSet;
pub use striped_mutex::StripedMutexBitSet;
pub use striped_rw::StripedRwLockBitSet;
pub use unsynchronized::UnsynchronizedBitSet;
