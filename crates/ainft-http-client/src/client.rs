//! HTTP client wrapper

use std::time::Duration;

use tracing::instrument;

use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::{RawResponse, Response};

/// HTTP client wrapper
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Create a new HTTP client builder
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// GET request returning raw response body
    pub async fn get_raw(&self, url: &str) -> Response<RawResponse> {
        let response = self.inner.get(url).send().await?;
        Ok(RawResponse::new(response))
    }

    /// GET request returning the body bytes of a successful response
    #[instrument(skip(self))]
    pub async fn get_bytes(&self, url: &str) -> Response<Vec<u8>> {
        let response = self.get_raw(url).await?;

        if !response.is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(HttpError::Status { status, message });
        }

        response.bytes().await
    }

    /// POST request builder
    pub fn post(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.inner.post(url))
    }

    /// GET request builder
    pub fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.inner.get(url))
    }
}

/// HTTP client builder for configuring proxy and timeout settings
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    proxy: Option<url::Url>,
}

impl HttpClientBuilder {
    /// Total request timeout applied by the transport
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Route every request through a proxy
    pub fn proxy(mut self, url: url::Url) -> Self {
        self.proxy = Some(url);
        self
    }

    /// Build the HTTP client
    pub fn build(self) -> Response<HttpClient> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(|e| HttpError::Proxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(HttpError::from)?;
        Ok(HttpClient { inner: client })
    }
}
