//! Error taxonomy for dictionary operations.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DictError {
    /// The key is absent from both generations.
    #[error("key not found")]
    NotFound,
    /// The capacity sequence has no usable entry after the current one.
    /// The dictionary keeps working but cannot grow any further.
    #[error("capacity sequence exhausted at capacity {capacity}")]
    CapacityExhausted { capacity: u64 },
    /// An insert probe visited every slot without finding a free one. Only
    /// reachable when a custom capacity sequence contains non-primes.
    #[error("probe sequence exhausted without a free slot (capacity {capacity})")]
    ProbeExhausted { capacity: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
