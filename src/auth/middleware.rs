//! Admin gate: middleware admitting only requests with a live session.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use super::session::session_id_from_cookie_header;
use crate::app_state::AppState;
use crate::error::ApiError;

/// The authenticated identity inserted into request extensions by
/// [`require_admin`]. Handlers behind the gate extract it with
/// `Extension<AdminIdentity>`.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    /// Session identifier (needed by logout).
    pub session_id: Uuid,
    /// Authenticated admin's identifier.
    pub admin_id: Uuid,
    /// Authenticated admin's username.
    pub username: String,
}

/// Rejects the request with 401 unless a valid, unexpired admin session
/// cookie accompanies it. Runs before any handler logic on admin routes.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session_id = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(session_id_from_cookie_header);

    let Some(session_id) = session_id else {
        return ApiError::Unauthorized.into_response();
    };

    let Some(record) = state.sessions.validate(session_id).await else {
        return ApiError::Unauthorized.into_response();
    };

    request.extensions_mut().insert(AdminIdentity {
        session_id,
        admin_id: record.admin_id,
        username: record.username,
    });
    next.run(request).await
}
