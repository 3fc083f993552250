use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

/// An accepted upload, held only in the visitor's session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedImage {
    /// Fresh per accepted upload; versions the image URL.
    pub id: Uuid,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
    /// Raw upload, served back by `GET /analyze/image`.
    #[serde(skip)]
    pub bytes: Bytes,
    pub file_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}
