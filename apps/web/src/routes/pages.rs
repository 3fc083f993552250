//! Axum route handlers for the landing and upload/analysis views.
//!
//! Form posts always answer with a 303 back to `/analyze` (Post/Redirect/Get);
//! failures are turned into a notification on the session instead of an error page.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::intake::{self, multipart::read_image_field};
use crate::render::{render_analyze_page, render_landing_page, AnalyzeView};
use crate::routes::cookie::{resolve_session, session_id_from_headers, with_cookie};
use crate::session::{begin_analysis, run_analysis, NoticeLevel};
use crate::state::AppState;

const ANALYZE_PATH: &str = "/analyze";

/// The view's image URL carries the image id, so a cached copy is never shown
/// for a different image.
const IMAGE_CACHE_CONTROL: &str = "private, max-age=3600";

/// Uploaded files are served back as-is; keep the browser from running them.
const IMAGE_CSP: &str = "default-src 'none'; style-src 'unsafe-inline'; sandbox";

/// GET /
pub async fn handle_landing() -> Html<String> {
    Html(render_landing_page())
}

/// GET /analyze
///
/// Renders the caller's session and consumes its pending notification.
/// Only the view inputs are copied under the store lock; rendering runs after.
pub async fn handle_analyze_view(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (session_id, cookie) = resolve_session(&state, &headers);

    let view = state
        .sessions
        .with_session(session_id, AnalyzeView::take_from);
    let html = render_analyze_page(&view);

    with_cookie(Html(html).into_response(), cookie)
}

/// GET /analyze/image
///
/// Raw bytes of the caller's current image, or 404 when there is none.
pub async fn handle_image(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(image) = session_id_from_headers(&headers).and_then(|id| state.sessions.image(id))
    else {
        return StatusCode::NOT_FOUND.into_response();
    };

    (
        [
            (header::CONTENT_TYPE, image.mime_type.clone()),
            (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
            (header::CONTENT_SECURITY_POLICY, IMAGE_CSP.to_string()),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        ],
        image.bytes.clone(),
    )
        .into_response()
}

/// POST /analyze/upload
///
/// Input Handler entry point for both the file picker and drag-drop.
pub async fn handle_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let (session_id, cookie) = resolve_session(&state, &headers);

    let accepted = match read_image_field(&mut multipart).await {
        Ok(upload) => intake::accept(upload).await,
        Err(e) => Err(e),
    };

    match accepted {
        Ok(image) => {
            info!(
                %session_id,
                file_name = %image.file_name,
                size_bytes = image.size_bytes,
                "Accepted outfit image"
            );
            state
                .sessions
                .with_session(session_id, |s| s.load_image(image));
        }
        Err(e) => {
            let err = AppError::from(e);
            warn!(%session_id, "Upload rejected: {err}");
            state.sessions.with_session(session_id, |s| {
                s.notify(NoticeLevel::Error, err.notification_message())
            });
        }
    }

    with_cookie(Redirect::to(ANALYZE_PATH).into_response(), cookie)
}

/// POST /analyze/run
///
/// Enters the busy state and hands the remote call to a background task; the
/// view polls until the task settles the session.
pub async fn handle_run(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (session_id, cookie) = resolve_session(&state, &headers);

    match begin_analysis(&state.sessions, session_id) {
        Ok((image, guard)) => {
            info!(%session_id, "Starting outfit analysis");
            tokio::spawn(run_analysis(Arc::clone(&state.analyzer), image, guard));
        }
        Err(e) => {
            warn!(%session_id, "Analysis not started: {e}");
            state.sessions.with_session(session_id, |s| {
                s.notify(NoticeLevel::Error, e.notification_message())
            });
        }
    }

    with_cookie(Redirect::to(ANALYZE_PATH).into_response(), cookie)
}

/// POST /analyze/clear
///
/// "Clear" and "Analyze Another": drops image and result together.
pub async fn handle_clear(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (session_id, cookie) = resolve_session(&state, &headers);
    let previous = state.sessions.with_session(session_id, |s| {
        let previous = s.state();
        s.clear();
        previous
    });
    debug!(%session_id, from = ?previous, "Cleared upload session");
    with_cookie(Redirect::to(ANALYZE_PATH).into_response(), cookie)
}
