use async_trait::async_trait;
use reqwest::{Request, Response};
use std::fmt::Debug;

/// Sends a single HTTP request and returns its response.
///
/// This is everything the request gateway needs from the network. TLS,
/// connection reuse and timeouts are the transport's business.
/// Implementations have to be usable from many tasks at once.
///
/// [`reqwest::Client`] implements this trait and is used unless a
/// different transport is passed to [`crate::ClientBuilder`].
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Send `request` and wait for the response head.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent or no response
    /// was received. HTTP error statuses are not errors at this level.
    async fn send(&self, request: Request) -> reqwest::Result<Response>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn send(&self, request: Request) -> reqwest::Result<Response> {
        self.execute(request).await
    }
}
