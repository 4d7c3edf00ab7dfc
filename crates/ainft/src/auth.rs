//! Access key validation

use ainft_common::Error;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::ApiClient;

#[derive(Debug, Serialize)]
struct ValidateKeyRequest<'a> {
    key: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidateKeyResponse {
    valid: bool,
}

/// Checks access keys against the `validate-key` endpoint
#[derive(Debug, Clone)]
pub struct KeyValidator {
    api: ApiClient,
}

impl KeyValidator {
    /// Create new [`KeyValidator`]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Whether the backend accepts the key
    #[instrument(skip_all)]
    pub async fn validate(&self, key: &str) -> Result<bool, Error> {
        if key.is_empty() {
            return Ok(false);
        }

        let response: ValidateKeyResponse = self
            .api
            .post_json("validate-key", &ValidateKeyRequest { key })
            .await
            .map_err(|e| Error::ValidationFailed(format!("Key validation failed: {}", e)))?;

        Ok(response.valid)
    }
}
