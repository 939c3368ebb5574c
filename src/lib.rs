//! BNM Rates Library
//!
//! Fetches the official exchange rates published by the National Bank of
//! Moldova and keeps decoded documents in a bounded in-memory LRU cache.

pub mod cache;
pub mod cli;
pub mod client;
pub mod data;
pub mod fetch;
pub mod output;

pub use cache::{BoundedCache, Cache, CacheError};
pub use client::{Client, ClientError};
pub use data::{Currency, Lang, Query, Rates};

/// Boxed error used at the pluggable seams (fetch, decode, cache backends)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
