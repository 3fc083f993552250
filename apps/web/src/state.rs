use std::sync::Arc;

use crate::analysis_client::AnalysisBackend;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// Default: `RemoteAnalysisClient` pointed at `ANALYZE_FUNCTION_URL`.
    pub analyzer: Arc<dyn AnalysisBackend>,
}
