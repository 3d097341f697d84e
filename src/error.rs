//! Error types shared by the map implementations

use thiserror::Error;

/// Failures that can surface from mutating an open-addressing table.
///
/// Lookups never fail: a missing key is reported as `None`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// Every slot reachable by the quadratic probe sequence was visited
    /// without finding the key, an empty slot, or a tombstone to reuse.
    #[error("quadratic probe exhausted all {capacity} slots (size {size})")]
    ProbeExhausted {
        /// Number of buckets in the table at the time of the failure
        capacity: usize,
        /// Number of live entries at the time of the failure
        size: usize,
    },
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, MapError>;
