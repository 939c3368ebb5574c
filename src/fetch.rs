//! Remote fetch of rate documents
//!
//! The client only depends on the [`FetchFn`] contract: given a cancellation
//! token and a URL, produce the full response body or an error.
//! [`HttpFetcher`] is the reqwest-backed implementation used by default.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::BoxError;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Future returned by a fetch function
pub type FetchFuture = BoxFuture<'static, Result<Vec<u8>, BoxError>>;

/// Pluggable fetch function: `(cancellation token, url) -> body`
pub type FetchFn = Arc<dyn Fn(CancellationToken, String) -> FetchFuture + Send + Sync>;

/// Wraps an async closure into a [`FetchFn`]
pub fn fetch_fn<F, Fut>(f: F) -> FetchFn
where
    F: Fn(CancellationToken, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>, BoxError>> + Send + 'static,
{
    Arc::new(move |cancel, url| f(cancel, url).boxed())
}

/// Errors that can occur when performing the HTTP GET
#[derive(Debug, Error)]
pub enum RequestError {
    /// Connecting, sending or waiting for the response failed
    #[error("do request: {0}")]
    Send(#[source] reqwest::Error),

    /// The server answered with something other than 200 OK
    #[error("status code: {0}")]
    Status(u16),

    /// Reading the response body failed
    #[error("read body: {0}")]
    Body(#[source] reqwest::Error),
}

/// HTTP client for downloading rate documents
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a new HttpFetcher with default settings
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new HttpFetcher with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Performs a GET request and returns the whole body
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The body of a 200 OK response
    /// * `Err(RequestError)` - On transport failure, any other status, or a
    ///   failed body read
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, RequestError> {
        trace!(url, "fetching rates document");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(RequestError::Send)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RequestError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(RequestError::Body)?;
        Ok(body.to_vec())
    }

    /// Adapts this fetcher to the [`FetchFn`] contract
    ///
    /// Cancellation is handled by dropping the returned future, which aborts
    /// the in-flight request.
    pub fn into_fetch_fn(self) -> FetchFn {
        fetch_fn(move |_cancel, url| {
            let fetcher = self.clone();
            async move { fetcher.get(&url).await.map_err(BoxError::from) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/official_exchange_rates"))
            .and(query_param("date", "01.01.2025"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!(
            "{}/en/official_exchange_rates?get_xml=1&date=01.01.2025",
            server.uri()
        );
        let body = HttpFetcher::new().get(&url).await.expect("request should succeed");

        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn test_get_non_200_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(418))
            .mount(&server)
            .await;

        let err = HttpFetcher::new().get(&server.uri()).await.unwrap_err();

        assert!(matches!(err, RequestError::Status(418)));
        assert!(err.to_string().contains("status code"));
    }

    #[tokio::test]
    async fn test_get_connection_error() {
        // Nothing listens on port 1
        let err = HttpFetcher::new()
            .with_timeout(Duration::from_secs(2))
            .get("http://127.0.0.1:1/")
            .await
            .unwrap_err();

        assert!(matches!(err, RequestError::Send(_)));
        assert!(err.to_string().contains("do request"));
    }

    #[tokio::test]
    async fn test_get_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let err = HttpFetcher::new()
            .with_timeout(Duration::from_millis(100))
            .get(&server.uri())
            .await
            .unwrap_err();

        assert!(matches!(err, RequestError::Send(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_into_fetch_fn() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let fetch = HttpFetcher::new().into_fetch_fn();
        let body = fetch(CancellationToken::new(), server.uri())
            .await
            .expect("fetch should succeed");

        assert_eq!(body, b"ok");
    }
}
