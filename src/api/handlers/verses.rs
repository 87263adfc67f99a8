//! Admin verse CRUD. Every successful mutation is committed first, then
//! broadcast to all realtime subscribers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::MessageResponse;
use crate::app_state::AppState;
use crate::domain::{ContentEvent, NewVerse, Verse, VerseUpdate};
use crate::error::{ApiError, ErrorResponse};

/// `GET /api/admin/verses` — Every verse, soft-deleted included.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/admin/verses",
    tag = "Verses",
    summary = "List all verses (admin view)",
    responses(
        (status = 200, description = "All verses, newest-updated first", body = Vec<Verse>),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn list_verses(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let verses = state.storage.get_all_verses_for_admin().await?;
    Ok(Json(verses))
}

/// `GET /api/admin/verses/{id}` — One verse by ID.
///
/// # Errors
///
/// Returns [`ApiError::VerseNotFound`] if no active verse matches.
#[utoipa::path(
    get,
    path = "/api/admin/verses/{id}",
    tag = "Verses",
    summary = "Fetch one verse",
    params(("id" = Uuid, Path, description = "Verse identifier")),
    responses(
        (status = 200, description = "The verse", body = Verse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Verse not found", body = ErrorResponse),
    )
)]
pub async fn get_verse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let verse = state
        .storage
        .get_verse_by_id(id)
        .await?
        .ok_or(ApiError::VerseNotFound(id))?;
    Ok(Json(verse))
}

/// `POST /api/admin/verses` — Create a verse.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] on storage failure.
#[utoipa::path(
    post,
    path = "/api/admin/verses",
    tag = "Verses",
    summary = "Create a verse",
    request_body = NewVerse,
    responses(
        (status = 201, description = "Verse created", body = Verse),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn create_verse(
    State(state): State<AppState>,
    Json(data): Json<NewVerse>,
) -> Result<impl IntoResponse, ApiError> {
    let verse = state.storage.create_verse(data).await?;
    state
        .broadcaster
        .publish_to_all(ContentEvent::VerseCreated(verse.clone()));
    Ok((StatusCode::CREATED, Json(verse)))
}

/// `PUT /api/admin/verses/{id}` — Partial update; revives a soft-deleted
/// verse.
///
/// # Errors
///
/// Returns [`ApiError::VerseNotFound`] if the ID matches nothing at all.
#[utoipa::path(
    put,
    path = "/api/admin/verses/{id}",
    tag = "Verses",
    summary = "Update a verse",
    params(("id" = Uuid, Path, description = "Verse identifier")),
    request_body = VerseUpdate,
    responses(
        (status = 200, description = "Updated verse", body = Verse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Verse not found", body = ErrorResponse),
    )
)]
pub async fn update_verse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<VerseUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let verse = state
        .storage
        .update_verse(id, update)
        .await?
        .ok_or(ApiError::VerseNotFound(id))?;
    state
        .broadcaster
        .publish_to_all(ContentEvent::VerseUpdated(verse.clone()));
    Ok(Json(verse))
}

/// `DELETE /api/admin/verses/{id}` — Soft-delete a verse.
///
/// # Errors
///
/// Returns [`ApiError::VerseNotFound`] if the ID matches nothing.
#[utoipa::path(
    delete,
    path = "/api/admin/verses/{id}",
    tag = "Verses",
    summary = "Soft-delete a verse",
    params(("id" = Uuid, Path, description = "Verse identifier")),
    responses(
        (status = 200, description = "Verse hidden from public views", body = MessageResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Verse not found", body = ErrorResponse),
    )
)]
pub async fn delete_verse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.storage.delete_verse(id).await? {
        return Err(ApiError::VerseNotFound(id));
    }
    state
        .broadcaster
        .publish_to_all(ContentEvent::VerseDeleted { id });
    Ok(Json(MessageResponse {
        message: "verse deleted".to_string(),
    }))
}

/// Verse CRUD routes, mounted behind the session gate.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/verses", get(list_verses))
        .route("/admin/verses", post(create_verse))
        .route("/admin/verses/{id}", get(get_verse))
        .route("/admin/verses/{id}", put(update_verse))
        .route("/admin/verses/{id}", delete(delete_verse))
}
