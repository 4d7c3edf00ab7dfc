//! HTTP request builder

use serde::Serialize;

use crate::error::HttpError;
use crate::multipart::MultipartFile;
use crate::response::{RawResponse, Response};

/// Trait for building and sending HTTP requests
pub trait RequestBuilderExt: Sized + Send {
    /// Set the request body as JSON
    fn json<T: Serialize>(self, body: &T) -> Self;

    /// Set the request body as a single-file multipart form
    fn multipart(self, file: MultipartFile) -> Self;

    /// Send the request and return a raw response
    fn send(self) -> impl std::future::Future<Output = Response<RawResponse>> + Send;
}

/// reqwest-based request builder
#[derive(Debug)]
pub struct RequestBuilder {
    inner: reqwest::RequestBuilder,
    // Multipart assembly errors are deferred until send
    deferred: Option<HttpError>,
}

impl RequestBuilder {
    pub(crate) fn new(inner: reqwest::RequestBuilder) -> Self {
        Self {
            inner,
            deferred: None,
        }
    }
}

impl RequestBuilderExt for RequestBuilder {
    fn json<T: Serialize>(self, body: &T) -> Self {
        Self {
            inner: self.inner.json(body),
            deferred: self.deferred,
        }
    }

    fn multipart(self, file: MultipartFile) -> Self {
        match file.into_form() {
            Ok(form) => Self {
                inner: self.inner.multipart(form),
                deferred: self.deferred,
            },
            Err(err) => Self {
                inner: self.inner,
                deferred: Some(err),
            },
        }
    }

    async fn send(self) -> Response<RawResponse> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        let response = self.inner.send().await.map_err(HttpError::from)?;
        Ok(RawResponse::new(response))
    }
}
