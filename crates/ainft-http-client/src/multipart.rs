//! Multipart file payloads

use crate::error::HttpError;
use crate::response::Response;

/// A single file part of a `multipart/form-data` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    /// Form field name
    pub field: String,
    /// File name reported to the server
    pub file_name: String,
    /// MIME type of the content
    pub mime: String,
    /// File content
    pub bytes: Vec<u8>,
}

impl MultipartFile {
    /// Create a new file part
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub(crate) fn into_form(self) -> Response<reqwest::multipart::Form> {
        let part = reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| HttpError::Multipart(e.to_string()))?;

        Ok(reqwest::multipart::Form::new().part(self.field, part))
    }
}
