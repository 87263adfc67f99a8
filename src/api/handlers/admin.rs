//! Admin session lifecycle and reporting endpoints.
//!
//! Login, logout, and registration live outside the session gate; the
//! profile and reporting endpoints sit behind it and read the identity the
//! gate placed in request extensions.

use axum::extract::{Extension, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AdminResponse, InteractionQuery, LoginRequest, MessageResponse, StatsQuery};
use crate::app_state::AppState;
use crate::auth::{AdminIdentity, SessionStore, session_id_from_cookie_header};
use crate::domain::{AdminProfile, DashboardStats, EmotionStat, NewAdmin, VerseInteraction};
use crate::error::{ApiError, ErrorResponse};

/// `POST /api/admin/login` — Establish an admin session.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] on blank fields and
/// [`ApiError::InvalidCredentials`] when the username is unknown or the
/// password does not match. The two failure modes are indistinguishable
/// from the outside.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Admin",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established, cookie issued", body = AdminResponse),
        (status = 400, description = "Blank username or password", body = ErrorResponse),
        (status = 401, description = "Unknown username or wrong password", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let admin = state
        .storage
        .get_admin_by_username(&credentials.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !state
        .storage
        .verify_admin_password(&credentials.password, &admin.password_hash)?
    {
        return Err(ApiError::InvalidCredentials);
    }

    state.storage.update_admin_last_login(admin.id).await?;
    let session_id = state.sessions.create(admin.id, &admin.username).await;
    let cookie = state.sessions.issue_cookie(session_id);

    tracing::info!(username = %admin.username, "admin logged in");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AdminResponse {
            message: "login successful".to_string(),
            admin: AdminProfile::from(&admin),
        }),
    ))
}

/// `POST /api/admin/logout` — Destroy the current session.
///
/// Succeeds whether or not a session cookie accompanies the request, so a
/// client holding a stale cookie can always clear it.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    tag = "Admin",
    summary = "Log out",
    responses(
        (status = 200, description = "Session destroyed, cookie cleared", body = MessageResponse),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let session_id = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(session_id_from_cookie_header);
    if let Some(session_id) = session_id {
        state.sessions.destroy(session_id).await;
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, SessionStore::clear_cookie())],
        Json(MessageResponse {
            message: "logout successful".to_string(),
        }),
    )
}

/// `POST /api/admin/register` — Create an admin account.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] on blank fields and
/// [`ApiError::DuplicateAdmin`] when the username or email is already
/// taken.
#[utoipa::path(
    post,
    path = "/api/admin/register",
    tag = "Admin",
    summary = "Register an admin account",
    request_body = NewAdmin,
    responses(
        (status = 201, description = "Account created", body = AdminResponse),
        (status = 400, description = "Blank required field", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(data): Json<NewAdmin>,
) -> Result<impl IntoResponse, ApiError> {
    if data.username.trim().is_empty() || data.email.trim().is_empty() || data.password.is_empty()
    {
        return Err(ApiError::Validation(
            "username, email and password are required".to_string(),
        ));
    }

    if state
        .storage
        .get_admin_by_username(&data.username)
        .await?
        .is_some()
    {
        return Err(ApiError::DuplicateAdmin(data.username));
    }
    if state
        .storage
        .get_admin_by_email(&data.email)
        .await?
        .is_some()
    {
        return Err(ApiError::DuplicateAdmin(data.email));
    }

    let admin = state.storage.create_admin(data).await?;
    tracing::info!(username = %admin.username, "admin account created");

    Ok((
        StatusCode::CREATED,
        Json(AdminResponse {
            message: "registration successful".to_string(),
            admin: AdminProfile::from(&admin),
        }),
    ))
}

/// `GET /api/admin/me` — Profile of the authenticated admin.
///
/// # Errors
///
/// Returns [`ApiError::AdminNotFound`] if the account behind the session
/// no longer exists.
#[utoipa::path(
    get,
    path = "/api/admin/me",
    tag = "Admin",
    summary = "Current admin profile",
    responses(
        (status = 200, description = "Authenticated admin", body = AdminProfile),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = state
        .storage
        .get_admin_by_username(&identity.username)
        .await?
        .ok_or_else(|| ApiError::AdminNotFound(identity.username.clone()))?;
    Ok(Json(AdminProfile::from(&admin)))
}

/// `GET /api/admin/dashboard` — Aggregate dashboard snapshot.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Admin",
    summary = "Dashboard statistics",
    responses(
        (status = 200, description = "Aggregate snapshot", body = DashboardStats),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.storage.get_dashboard_stats().await?;
    Ok(Json(stats))
}

/// `GET /api/admin/interactions` — Recent interactions, newest first.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/admin/interactions",
    tag = "Admin",
    summary = "Recent interactions",
    params(InteractionQuery),
    responses(
        (status = 200, description = "Interactions, newest first", body = Vec<VerseInteraction>),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn interactions(
    State(state): State<AppState>,
    Query(query): Query<InteractionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let interactions = state.storage.get_verse_interactions(query.limit).await?;
    Ok(Json(interactions))
}

/// `GET /api/admin/emotions/stats` — Per-day emotion rollups.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/admin/emotions/stats",
    tag = "Admin",
    summary = "Emotion rollups",
    params(StatsQuery),
    responses(
        (status = 200, description = "Rollups within the date bounds", body = Vec<EmotionStat>),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn emotion_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state
        .storage
        .get_emotion_stats(query.start_date, query.end_date)
        .await?;
    Ok(Json(stats))
}

/// Session lifecycle routes, deliberately outside the admin gate.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
        .route("/admin/register", post(register))
}

/// Profile and reporting routes, mounted behind the session gate.
pub fn gated_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/me", get(me))
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/interactions", get(interactions))
        .route("/admin/emotions/stats", get(emotion_stats))
}
