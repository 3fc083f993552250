//! JSON proxy to the analysis function for script clients.

use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::intake::validate_data_url;
use crate::models::analysis::{AnalysisResult, AnalyzeRequest};
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Accepts `{ imageBase64 }`, applies the same type/size rules as the upload
/// form, and returns the `AnalysisResult` or the error envelope.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    validate_data_url(&request.image_base64)?;

    let result = state.analyzer.analyze(&request.image_base64).await?;
    info!(
        accessories = result.accessories.len(),
        "Outfit analysis served over the JSON API"
    );

    Ok(Json(result))
}
