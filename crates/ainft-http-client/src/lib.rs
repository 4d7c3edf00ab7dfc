//! HTTP client abstraction for AINFT
//!
//! This crate wraps `reqwest` so the rest of the workspace talks to the
//! generation, pinning and ledger-query endpoints through one small surface:
//! JSON requests, multipart uploads and raw byte downloads.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use ainft_http_client::{HttpClient, RequestBuilderExt, Response};
//!
//! async fn example() -> Response<String> {
//!     let client = HttpClient::builder()
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!     let response = client
//!         .post("https://api.example.com/validate-key")
//!         .json(&serde_json::json!({ "key": "secret" }))
//!         .send()
//!         .await?;
//!     response.text().await
//! }
//! ```

mod client;
mod error;
mod multipart;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder};
pub use error::HttpError;
pub use multipart::MultipartFile;
pub use request::{RequestBuilder, RequestBuilderExt};
pub use response::{RawResponse, Response};
