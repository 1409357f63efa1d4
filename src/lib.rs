//! bucket-hashmap: a separately-chained HashMap with explicit load-factor
//! bounds and bucket-level introspection.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small map whose resizing policy and bucket layout are part of
//!   the contract rather than hidden tuning, so callers (and tests) can
//!   reason about capacity, load factor, and bucket occupancy directly.
//! - Layers:
//!   - Table<K, V>: bucket storage (`Vec<Vec<Entry>>`) plus the grow/shrink
//!     policy. Never hashes or compares keys itself; it is handed a
//!     precomputed hash and an equality predicate.
//!   - BucketedHashMap<K, V, S>: public API. Owns the hasher, computes
//!     hashes, and guards every entry point that calls user code.
//!
//! Constraints
//! - Single-threaded; the map is `!Sync`.
//! - Capacity is a power of two, starting at 16 and never shrinking below
//!   it. Bucket index is `hash & (capacity - 1)`.
//! - Unique keys. `insert` never overwrites; `insert_or_replace`,
//!   `get_or_insert_default`, `Extend` and the sequence constructors do.
//! - Every failed call leaves the map unchanged.
//!
//! Resizing
//! - After an insert, if `len / capacity > upper` the table doubles.
//! - After a removal, if `len / capacity < lower` and capacity is above 16,
//!   the table halves.
//! - Both thresholds are strict. One step per operation.
//! - A resize builds a fresh bucket array from the cached per-entry hashes
//!   and swaps it in; `K: Hash` is never called after insertion.
//!
//! Iteration and invalidation
//! - Order is bucket-major, then slot order within a bucket. It is not
//!   insertion order and is not stable across resizes.
//! - Borrowing iterators freeze the map for their lifetime.
//! - `Cursor` is a detached position stamped with the table epoch; any
//!   resize or `clear` bumps the epoch and the cursor reports
//!   `Error::StaleCursor` instead of yielding from a reshaped table.
//!
//! Reentrancy policy
//! - Public operations that invoke `K: Hash`, `K: Eq`, or a value
//!   constructor record their name in a debug-only tracker; calling back
//!   into the same map from that user code panics in debug builds, naming
//!   both operations. `Drop` for removed keys and values runs after the
//!   operation has ended.
//!
//! Notes and non-goals
//! - No concurrent access, no persistence, no eviction.
//! - `bucket_size` reports `Error::EmptyBucket` for an empty bucket rather
//!   than returning 0.

pub mod bucket_hash_map;
mod bucket_hash_map_proptest;
mod error;
pub mod iter;
mod load_factor;
mod reentrancy;
mod table;

// Public surface
pub use bucket_hash_map::BucketedHashMap;
pub use error::{Error, Result};
pub use iter::Cursor;
pub use load_factor::{
    LoadFactors, DEFAULT_LOWER_LOAD_FACTOR, DEFAULT_UPPER_LOAD_FACTOR, MIN_CAPACITY,
};
