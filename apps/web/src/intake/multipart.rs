use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::BytesMut;

use super::{check_content_type, check_size, FileUpload, IntakeError};

/// Form field carrying the file, for both the picker and the drop handler.
pub const IMAGE_FIELD: &str = "image";

fn map_multipart_error(err: MultipartError) -> IntakeError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        IntakeError::FileTooLarge
    } else {
        IntakeError::Multipart(err.body_text())
    }
}

/// Pulls the `image` field out of a multipart body.
///
/// The declared type is checked before any bytes are read, and reading stops as
/// soon as the running size reaches the limit.
pub async fn read_image_field(multipart: &mut Multipart) -> Result<FileUpload, IntakeError> {
    while let Some(mut field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();

        // An empty picker still submits the field, just without a file name.
        if file_name.is_empty() {
            return Err(IntakeError::MissingField);
        }

        check_content_type(&content_type)?;

        let mut buf = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(map_multipart_error)? {
            check_size((buf.len() + chunk.len()) as u64)?;
            buf.extend_from_slice(&chunk);
        }

        if buf.is_empty() {
            return Err(IntakeError::EmptyFile);
        }

        return Ok(FileUpload {
            file_name,
            content_type,
            bytes: buf.freeze(),
        });
    }

    Err(IntakeError::MissingField)
}
