//! Cache module for keeping decoded rate documents in memory
//!
//! This module defines the [`Cache`] capability the client consumes and a
//! bounded, least-recently-used in-memory implementation of it. Any other
//! backend (remote, no-op, ...) only needs to implement the two methods of
//! [`Cache`] to be usable by the client.

mod bounded;

pub use bounded::BoundedCache;

use async_trait::async_trait;
use thiserror::Error;

use crate::BoxError;

/// Error types for cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// The requested key is not present. Expected on a miss.
    #[error("not found")]
    NotFound,

    /// The cache was constructed with a capacity of zero
    #[error("capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    /// The backing store failed
    #[error("cache backend: {0}")]
    Backend(#[source] BoxError),
}

impl CacheError {
    /// Returns true for the `NotFound` sentinel
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound)
    }
}

/// Key-value store the client reads from and populates on a miss.
#[async_trait]
pub trait Cache<V>: Send + Sync {
    /// Returns the value stored under `key`, or [`CacheError::NotFound`].
    async fn get(&self, key: &str) -> Result<V, CacheError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: V) -> Result<(), CacheError>;
}
