//! Cache-aside client for BNM exchange rates
//!
//! [`Client::fetch`] looks the query up in the configured cache, and on a miss
//! fetches the document, decodes it and stores the result. Fetching and
//! decoding are pluggable so the client can be pointed at other sources or
//! document shapes without touching the caching logic.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::{Cache, CacheError};
use crate::data::{decode_xml, Query, Rates};
use crate::fetch::{FetchFn, HttpFetcher};
use crate::BoxError;

/// Pluggable decode function: response body to value
pub type DecodeFn<V> = Arc<dyn Fn(&[u8]) -> Result<V, BoxError> + Send + Sync>;

/// Receives errors that do not fail a fetch
pub type NotifyFn = Arc<dyn Fn(&ClientError) + Send + Sync>;

/// Error types for a fetch, one per failing stage
#[derive(Debug, Error)]
pub enum ClientError {
    /// The cache failed for a reason other than a miss
    #[error("get cache: {0}")]
    CacheRead(#[source] CacheError),

    /// The fetch function failed
    #[error("get request: {0}")]
    Fetch(#[source] BoxError),

    /// The cancellation token fired while fetching
    #[error("get request: cancelled")]
    Cancelled,

    /// The decode function rejected the body
    #[error("parse body: {0}")]
    Decode(#[source] BoxError),

    /// Storing the decoded value failed. Only ever passed to the notifier.
    #[error("set cache: {0}")]
    CacheWrite(#[source] CacheError),
}

/// Fetches rate documents, going through an optional cache
///
/// The collaborators are fixed once the client is built; share it behind an
/// `Arc` to use it from several tasks. Defaults:
/// * no cache, so every call fetches
/// * fetch: [`HttpFetcher`] GET against bnm.md
/// * decode: [`decode_xml`] (for `Client<Rates>`)
/// * notifier: does nothing
pub struct Client<V = Rates> {
    cache: Option<Arc<dyn Cache<V>>>,
    fetch: FetchFn,
    decode: DecodeFn<V>,
    notify: NotifyFn,
}

impl Client<Rates> {
    /// Create a client that downloads and parses the official XML document
    pub fn new() -> Self {
        Self::with_decoder(decode_xml)
    }
}

impl Default for Client<Rates> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Client<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a client producing `V` with a custom decode function and the
    /// default fetcher
    pub fn with_decoder<F, E>(decode: F) -> Self
    where
        F: Fn(&[u8]) -> Result<V, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::from_parts(HttpFetcher::new().into_fetch_fn(), decode)
    }

    /// Create a client from a fetch function and a decode function
    pub fn from_parts<F, E>(fetch: FetchFn, decode: F) -> Self
    where
        F: Fn(&[u8]) -> Result<V, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            cache: None,
            fetch,
            decode: Arc::new(move |data: &[u8]| decode(data).map_err(Into::<BoxError>::into)),
            notify: Arc::new(|_: &ClientError| {}),
        }
    }

    /// Use `cache` to serve repeated queries
    pub fn with_cache<C>(mut self, cache: Arc<C>) -> Self
    where
        C: Cache<V> + 'static,
    {
        self.cache = Some(cache);
        self
    }

    /// Replace the fetch function
    pub fn with_fetcher(mut self, fetch: FetchFn) -> Self {
        self.fetch = fetch;
        self
    }

    /// Receive errors that are tolerated instead of failing the fetch
    pub fn with_notifier<F>(mut self, notify: F) -> Self
    where
        F: Fn(&ClientError) + Send + Sync + 'static,
    {
        self.notify = Arc::new(notify);
        self
    }

    /// Retrieves the document for `query`
    ///
    /// # Returns
    /// * `Ok(V)` - From the cache on a hit, freshly fetched otherwise
    /// * `Err(ClientError)` - Naming the stage that failed. A failure to
    ///   store the result in the cache is not an error; it goes to the
    ///   notifier.
    pub async fn fetch(&self, query: &Query) -> Result<V, ClientError> {
        self.fetch_with_cancel(query, &CancellationToken::new()).await
    }

    /// Like [`Client::fetch`], giving up on the download once `cancel` fires
    ///
    /// The token only covers the fetch step. Once cancelled, nothing is
    /// written to the cache.
    pub async fn fetch_with_cancel(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<V, ClientError> {
        let key = query.id();

        if let Some(cache) = &self.cache {
            match cache.get(&key).await {
                Ok(value) => {
                    debug!(key = %key, "cache hit");
                    return Ok(value);
                }
                Err(CacheError::NotFound) => debug!(key = %key, "cache miss"),
                Err(err) => return Err(ClientError::CacheRead(err)),
            }
        }

        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let data = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = (self.fetch)(cancel.clone(), query.request_url()) => {
                result.map_err(ClientError::Fetch)?
            }
        };

        let value = (self.decode)(&data).map_err(ClientError::Decode)?;

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.set(&key, value.clone()).await {
                (self.notify)(&ClientError::CacheWrite(err));
            }
        }

        Ok(value)
    }
}

impl<V> fmt::Debug for Client<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
