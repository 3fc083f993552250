use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis_client::AnalysisError;
use crate::intake::IntakeError;

pub const GENERIC_ANALYSIS_FAILURE: &str = "Failed to analyze outfit. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please upload an image file")]
    InvalidFileType,

    #[error("Image must be under 10MB")]
    FileTooLarge,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("{0}")]
    Application(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Text for the transient notification shown on the upload view.
    pub fn notification_message(&self) -> String {
        match self {
            AppError::InvalidFileType | AppError::FileTooLarge => self.to_string(),
            AppError::Transport(_) => GENERIC_ANALYSIS_FAILURE.to_string(),
            AppError::Application(msg) if !msg.trim().is_empty() => msg.clone(),
            AppError::Application(_) => GENERIC_ANALYSIS_FAILURE.to_string(),
            AppError::Validation(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::InvalidFileType(_) => AppError::InvalidFileType,
            IntakeError::FileTooLarge => AppError::FileTooLarge,
            e @ (IntakeError::MissingField | IntakeError::EmptyFile | IntakeError::NotBase64) => {
                AppError::Validation(e.to_string())
            }
            IntakeError::Multipart(msg) => AppError::Validation(msg),
            IntakeError::Encode(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Application(msg) => AppError::Application(msg),
            AnalysisError::Malformed(e) => {
                AppError::Application(format!("The stylist returned a malformed response: {e}"))
            }
            other => AppError::Transport(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidFileType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "INVALID_FILE_TYPE",
                self.to_string(),
            ),
            AppError::FileTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "FILE_TOO_LARGE",
                self.to_string(),
            ),
            AppError::Transport(msg) => {
                tracing::error!("Analysis transport error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "TRANSPORT_FAILURE",
                    GENERIC_ANALYSIS_FAILURE.to_string(),
                )
            }
            AppError::Application(msg) => {
                tracing::error!("Analysis application error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "APPLICATION_ERROR",
                    self.notification_message(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
