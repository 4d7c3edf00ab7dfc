//! Image generation client

use std::fmt::Debug;

use ainft_common::{Error, GeneratedImage, GenerationParams};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::ApiClient;
use crate::prompt::clean_prompt;

/// Text-to-image backend
#[async_trait]
pub trait ImageGenerator: Debug + Send + Sync {
    /// Generate one image for an already cleaned prompt
    async fn generate(&self, prompt: &str, params: &GenerationParams)
        -> Result<GeneratedImage, Error>;
}

/// Generation request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Cleaned prompt
    pub prompt: String,
    /// Height in pixels
    pub height: u32,
    /// Width in pixels
    pub width: u32,
    /// Style preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<String>,
}

/// Successful generation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// `data:` URL or remote url of the image
    pub image_url: String,
}

/// Prepare a generation request
///
/// Cleans the prompt and checks the engine/dimension pairing.
pub fn prepare_request(
    raw_prompt: &str,
    params: &GenerationParams,
) -> Result<GenerateRequest, Error> {
    let prompt = clean_prompt(raw_prompt);
    if prompt.is_empty() {
        return Err(Error::ValidationFailed("Prompt is required".to_string()));
    }

    params.engine.validate_dimensions(params.dimensions)?;

    Ok(GenerateRequest {
        prompt,
        height: params.dimensions.height,
        width: params.dimensions.width,
        style_preset: params.style_preset.map(|p| p.to_string()),
    })
}

/// [`ImageGenerator`] backed by the `generate-image-{engine}` endpoints
#[derive(Debug, Clone)]
pub struct HttpImageGenerator {
    api: ApiClient,
}

impl HttpImageGenerator {
    /// Create new [`HttpImageGenerator`]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    #[instrument(
        skip(self, params),
        fields(engine = %params.engine, dimensions = %params.dimensions)
    )]
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<GeneratedImage, Error> {
        let request = prepare_request(prompt, params)?;

        let response: GenerateResponse = self
            .api
            .post_json(&params.engine.endpoint(), &request)
            .await
            .map_err(|e| Error::GenerationFailed(e.to_string()))?;

        if response.image_url.is_empty() {
            return Err(Error::GenerationFailed(
                "No image URL in response".to_string(),
            ));
        }

        tracing::debug!("Image generated with {}", params.engine);

        Ok(GeneratedImage::generated(
            response.image_url,
            request.prompt,
            params.clone(),
        ))
    }
}
