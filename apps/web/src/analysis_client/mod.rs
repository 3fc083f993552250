/// Remote Analysis Client — the single point of entry for calls to the outfit
/// analysis function.
///
/// No other module may call the function endpoint directly. The client does not
/// retry: a failed call needs a fresh, user-initiated attempt.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::analysis::{AnalysisResult, AnalyzeRequest};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Function returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Application(String),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Anything that can turn an encoded image into a recommendation.
///
/// Carried in `AppState` as `Arc<dyn AnalysisBackend>`.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, image_data_url: &str) -> Result<AnalysisResult, AnalysisError>;
}

/// HTTP client for the hosted analysis function.
#[derive(Clone)]
pub struct RemoteAnalysisClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteAnalysisClient {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build().context("Failed to build HTTP client")?,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisBackend for RemoteAnalysisClient {
    async fn analyze(&self, image_data_url: &str) -> Result<AnalysisResult, AnalysisError> {
        let body = AnalyzeRequest {
            image_base64: image_data_url.to_string(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(
            "Analysis function responded with {status} ({} bytes)",
            text.len()
        );

        interpret_response(status, &text)
    }
}

/// Maps a raw function response onto the result or error taxonomy.
///
/// - non-2xx → `Status` (a transport-level failure)
/// - 2xx carrying an `error` field → `Application`
/// - 2xx not matching the `AnalysisResult` shape → `Malformed`
pub fn interpret_response(status: StatusCode, body: &str) -> Result<AnalysisResult, AnalysisError> {
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| error_message(&v))
            .unwrap_or_else(|| body.to_string());
        warn!("Analysis function returned {status}: {message}");
        return Err(AnalysisError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let value: Value = serde_json::from_str(body)?;

    if let Some(message) = error_message(&value) {
        return Err(AnalysisError::Application(message));
    }

    Ok(serde_json::from_value(value)?)
}

/// Extracts the message of an `error` field, which may be a bare string or an
/// object with a `message` key. `null` means no error.
fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => Some(
            obj.get("message")
                .and_then(|m| m.as_str())
                .map(String::from)
                .unwrap_or_else(|| Value::Object(obj.clone()).to_string()),
        ),
        other => Some(other.to_string()),
    }
}
