//! Backend API client core
//!
//! The generation, pinning, ledger query and key validation endpoints all
//! live under one base url and answer failures with `{error, details?}`.

use std::fmt;

use ainft_common::Error;
use ainft_http_client::{HttpClient, HttpError, MultipartFile, RequestBuilderExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

/// Error body returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Optional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Parse an error body
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.error, details),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Why a backend call failed
///
/// Callers fold this into the error variant of their operation.
#[derive(Debug)]
pub enum ApiFailure {
    /// Backend answered with an error
    Remote {
        /// HTTP status
        status: u16,
        /// Message taken from the error body, or the raw body
        message: String,
    },
    /// Request never got a response
    Transport(HttpError),
    /// Response body did not have the expected shape
    Malformed(String),
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::Remote { status, message } => {
                write!(f, "HTTP error ({}): {}", status, message)
            }
            ApiFailure::Transport(err) => write!(f, "{}", err),
            ApiFailure::Malformed(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for ApiFailure {}

impl From<HttpError> for ApiFailure {
    fn from(err: HttpError) -> Self {
        ApiFailure::Transport(err)
    }
}

/// Client for the backend API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: Url,
}

impl ApiClient {
    /// Create a client with a default [`HttpClient`]
    pub fn new(base_url: Url) -> Self {
        Self::with_http_client(HttpClient::new(), base_url)
    }

    /// Create a client using an existing [`HttpClient`]
    pub fn with_http_client(http: HttpClient, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize(base_url),
        }
    }

    /// Base url
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Absolute url of an endpoint
    pub fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// POST a JSON body and decode the JSON answer
    #[instrument(skip(self, body))]
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiFailure>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self
            .endpoint(path)
            .map_err(|e| ApiFailure::Malformed(e.to_string()))?;
        let response = self.http.post(url.as_str()).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        decode(status, &text)
    }

    /// GET and decode the JSON answer
    #[instrument(skip(self))]
    pub async fn get_json<R>(&self, path: &str) -> Result<R, ApiFailure>
    where
        R: DeserializeOwned,
    {
        let url = self
            .endpoint(path)
            .map_err(|e| ApiFailure::Malformed(e.to_string()))?;
        let response = self.http.get(url.as_str()).send().await?;
        let status = response.status();
        let text = response.text().await?;

        decode(status, &text)
    }

    /// POST one file as multipart and decode the JSON answer
    #[instrument(skip(self, file))]
    pub async fn post_file<R>(&self, path: &str, file: MultipartFile) -> Result<R, ApiFailure>
    where
        R: DeserializeOwned,
    {
        let url = self
            .endpoint(path)
            .map_err(|e| ApiFailure::Malformed(e.to_string()))?;
        let response = self.http.post(url.as_str()).multipart(file).send().await?;
        let status = response.status();
        let text = response.text().await?;

        decode(status, &text)
    }
}

fn normalize(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn decode<R: DeserializeOwned>(status: u16, body: &str) -> Result<R, ApiFailure> {
    if (200..300).contains(&status) {
        return serde_json::from_str::<R>(body).map_err(|err| {
            tracing::warn!("Http Response error: {}", err);
            match ErrorResponse::from_json(body) {
                Ok(error) => ApiFailure::Remote {
                    status,
                    message: error.to_string(),
                },
                Err(_) => ApiFailure::Malformed(err.to_string()),
            }
        });
    }

    let message = match ErrorResponse::from_json(body) {
        Ok(error) => error.to_string(),
        Err(_) => body.to_string(),
    };
    Err(ApiFailure::Remote { status, message })
}
