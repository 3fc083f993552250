use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use uuid::Uuid;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "stylesense_session";

/// Reads the session id from the `Cookie` header, ignoring anything malformed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Resolves the caller's session; returns a `Set-Cookie` value when a new one was created.
pub fn resolve_session(state: &AppState, headers: &HeaderMap) -> (Uuid, Option<HeaderValue>) {
    let (id, created) = state.sessions.resolve(session_id_from_headers(headers));
    let cookie = created
        .then(|| HeaderValue::from_str(&session_cookie(id)).ok())
        .flatten();
    (id, cookie)
}

pub fn with_cookie(mut response: Response, cookie: Option<HeaderValue>) -> Response {
    if let Some(cookie) = cookie {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}
