//! Error type shared by every fallible map operation.

use thiserror::Error;

/// Failures reported by [`BucketedHashMap`](crate::BucketedHashMap).
///
/// A failed call never leaves the map partially mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Load factors must satisfy `0 < lower < upper < 1`.
    #[error("invalid load factors: need 0 < lower ({lower}) < upper ({upper}) < 1")]
    InvalidConfiguration { lower: f64, upper: f64 },
    /// Parallel key/value sequences of different lengths.
    #[error("got {keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },
    #[error("key not found")]
    KeyNotFound,
    /// The bucket a key maps to holds no entries.
    #[error("bucket {index} is empty")]
    EmptyBucket { index: usize },
    /// The table was rebuilt or cleared after the cursor was created.
    #[error("cursor is stale: the table changed shape since it was created")]
    StaleCursor,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
