//! IPFS pinning client

use std::fmt::Debug;

use ainft_common::{Error, GeneratedImage, PinnedAsset};
use ainft_http_client::{HttpClient, MultipartFile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::api::ApiClient;

/// Multipart field the pinning endpoint reads
pub const UPLOAD_FIELD: &str = "file";

/// Image bytes ready to be pinned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// File content
    pub bytes: Vec<u8>,
    /// File name sent with the upload
    pub file_name: String,
    /// MIME type sent with the upload
    pub mime: String,
}

/// Pinning service
#[async_trait]
pub trait Pinner: Debug + Send + Sync {
    /// Pin the image, tying the result to `source_image`
    async fn pin(&self, payload: ImagePayload, source_image: Uuid) -> Result<PinnedAsset, Error>;
}

/// Response of the `upload` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadResponse {
    /// Content id
    pub ipfs_hash: String,
    /// Pinned size in bytes
    pub pin_size: u64,
    /// Pin time
    pub timestamp: String,
    /// Gateway url
    pub ipfs_url: String,
}

/// [`Pinner`] backed by the `upload` endpoint
#[derive(Debug, Clone)]
pub struct HttpPinner {
    api: ApiClient,
}

impl HttpPinner {
    /// Create new [`HttpPinner`]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Pinner for HttpPinner {
    #[instrument(
        skip(self, payload),
        fields(file_name = %payload.file_name, size = payload.bytes.len())
    )]
    async fn pin(&self, payload: ImagePayload, source_image: Uuid) -> Result<PinnedAsset, Error> {
        let file = MultipartFile::new(
            UPLOAD_FIELD,
            payload.file_name,
            payload.mime,
            payload.bytes,
        );

        let response: UploadResponse = self
            .api
            .post_file("upload", file)
            .await
            .map_err(|e| Error::PinningFailed(e.to_string()))?;

        tracing::info!("Image pinned to IPFS with hash: {}", response.ipfs_hash);

        Ok(PinnedAsset {
            content_hash: response.ipfs_hash,
            gateway_url: response.ipfs_url,
            size_bytes: response.pin_size,
            pinned_at: response.timestamp,
            source_image,
        })
    }
}

/// Obtain the bytes of an image
///
/// `data:` URLs are decoded locally, remote URLs are fetched once.
#[instrument(skip_all, fields(image = %image.id))]
pub async fn image_payload(
    http: &HttpClient,
    image: &GeneratedImage,
) -> Result<ImagePayload, Error> {
    let file_name = image.file_name();

    if let Some(bytes) = image.bytes()? {
        let mime = image.mime().unwrap_or("image/png").to_string();
        return Ok(ImagePayload {
            bytes,
            file_name,
            mime,
        });
    }

    let response = http
        .get_raw(&image.url)
        .await
        .map_err(|e| Error::PinningFailed(format!("Could not fetch image: {}", e)))?;

    if !response.is_success() {
        return Err(Error::PinningFailed(format!(
            "Could not fetch image: HTTP {}",
            response.status()
        )));
    }

    let mime = response
        .content_type()
        .and_then(|c| c.split(';').next())
        .unwrap_or("image/png")
        .to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::PinningFailed(format!("Could not fetch image: {}", e)))?;

    Ok(ImagePayload {
        bytes,
        file_name,
        mime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_field_names() {
        let response: UploadResponse = serde_json::from_str(
            r#"{"IpfsHash":"QmX","PinSize":2048,"Timestamp":"2024-05-01T10:00:00Z","IpfsUrl":"https://gateway.pinata.cloud/ipfs/QmX"}"#,
        )
        .expect("parse");

        assert_eq!(response.ipfs_hash, "QmX");
        assert_eq!(response.pin_size, 2048);
        assert_eq!(response.ipfs_url, "https://gateway.pinata.cloud/ipfs/QmX");
    }
}
