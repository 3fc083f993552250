//! Input Handler — validates an uploaded file and encodes it as a data URL.
//!
//! Validation happens before any bytes are encoded: the declared media type must
//! start with `image/` and the payload must stay under `MAX_IMAGE_BYTES`.
//! Encoding runs on the blocking pool; there is no cancellation, so two uploads
//! racing for the same session both finish and the last one to be stored wins.

pub mod multipart;

use base64::Engine as _;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::image::UploadedImage;

/// Uploads of this size or larger are rejected.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Declared media type '{0}' is not an image")]
    InvalidFileType(String),

    #[error("Image must be under 10MB")]
    FileTooLarge,

    #[error("No image was provided")]
    MissingField,

    #[error("The selected file is empty")]
    EmptyFile,

    #[error("Image data must be base64-encoded")]
    NotBase64,

    #[error("Upload could not be read: {0}")]
    Multipart(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// A file as received from the picker or a drop event.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

pub fn check_content_type(content_type: &str) -> Result<(), IntakeError> {
    if content_type.trim().to_ascii_lowercase().starts_with("image/") {
        Ok(())
    } else {
        Err(IntakeError::InvalidFileType(content_type.to_string()))
    }
}

pub fn check_size(size_bytes: u64) -> Result<(), IntakeError> {
    if size_bytes >= MAX_IMAGE_BYTES {
        Err(IntakeError::FileTooLarge)
    } else {
        Ok(())
    }
}

pub fn validate(upload: &FileUpload) -> Result<(), IntakeError> {
    check_content_type(&upload.content_type)?;
    if upload.bytes.is_empty() {
        return Err(IntakeError::EmptyFile);
    }
    check_size(upload.bytes.len() as u64)
}

/// Encodes raw bytes as `data:<mime>;base64,<payload>`.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime_type};base64,{payload}")
}

/// Validates the upload and encodes it off the async executor.
///
/// Returns the new `UploadedImage`; the caller stores it (clearing any prior result).
pub async fn accept(upload: FileUpload) -> Result<UploadedImage, IntakeError> {
    if let Err(e) = validate(&upload) {
        warn!(
            "Rejected upload '{}' ({}, {} bytes): {e}",
            upload.file_name,
            upload.content_type,
            upload.bytes.len()
        );
        return Err(e);
    }

    let FileUpload {
        file_name,
        content_type,
        bytes,
    } = upload;
    let mime_type = content_type.trim().to_ascii_lowercase();
    let size_bytes = bytes.len() as u64;

    let data_url = {
        let mime_type = mime_type.clone();
        let bytes = bytes.clone();
        tokio::task::spawn_blocking(move || encode_data_url(&mime_type, &bytes))
            .await
            .map_err(|e| IntakeError::Encode(e.to_string()))?
    };

    debug!("Encoded '{file_name}' into a {} byte data URL", data_url.len());

    Ok(UploadedImage {
        id: Uuid::new_v4(),
        data_url,
        bytes,
        file_name,
        size_bytes,
        mime_type,
    })
}

/// Checks a data URL handed to the JSON API: must be a base64 image data URL
/// whose decoded payload stays under the size limit.
pub fn validate_data_url(data_url: &str) -> Result<(), IntakeError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| IntakeError::InvalidFileType("not a data URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| IntakeError::InvalidFileType("not a data URL".to_string()))?;

    let mut params = header.split(';');
    check_content_type(params.next().unwrap_or_default())?;
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(IntakeError::NotBase64);
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| IntakeError::NotBase64)?;
    if decoded.is_empty() {
        return Err(IntakeError::EmptyFile);
    }
    check_size(decoded.len() as u64)
}
