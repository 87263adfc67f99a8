//! Admin emotion CRUD.
//!
//! Name uniqueness is enforced against the *active* set: soft-deleting an
//! emotion frees its name for a later create.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::MessageResponse;
use crate::app_state::AppState;
use crate::domain::{ContentEvent, Emotion, EmotionUpdate, NewEmotion};
use crate::error::{ApiError, ErrorResponse};

/// `GET /api/admin/emotions` — Active emotions in display order.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/admin/emotions",
    tag = "Emotions",
    summary = "List active emotions (admin view)",
    responses(
        (status = 200, description = "Active emotions, sort order ascending", body = Vec<Emotion>),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn list_emotions(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let emotions = state.storage.get_all_emotions().await?;
    Ok(Json(emotions))
}

/// `GET /api/admin/emotions/{id}` — One emotion by ID.
///
/// # Errors
///
/// Returns [`ApiError::EmotionNotFound`] if no active emotion matches.
#[utoipa::path(
    get,
    path = "/api/admin/emotions/{id}",
    tag = "Emotions",
    summary = "Fetch one emotion",
    params(("id" = Uuid, Path, description = "Emotion identifier")),
    responses(
        (status = 200, description = "The emotion", body = Emotion),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Emotion not found", body = ErrorResponse),
    )
)]
pub async fn get_emotion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let emotion = state
        .storage
        .get_emotion_by_id(id)
        .await?
        .ok_or(ApiError::EmotionNotFound(id))?;
    Ok(Json(emotion))
}

/// `POST /api/admin/emotions` — Create an emotion.
///
/// # Errors
///
/// Returns [`ApiError::DuplicateEmotion`] when an active emotion already
/// uses the name.
#[utoipa::path(
    post,
    path = "/api/admin/emotions",
    tag = "Emotions",
    summary = "Create an emotion",
    request_body = NewEmotion,
    responses(
        (status = 201, description = "Emotion created", body = Emotion),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 409, description = "Name already in active use", body = ErrorResponse),
    )
)]
pub async fn create_emotion(
    State(state): State<AppState>,
    Json(data): Json<NewEmotion>,
) -> Result<impl IntoResponse, ApiError> {
    if state
        .storage
        .get_emotion_by_name(&data.name)
        .await?
        .is_some()
    {
        return Err(ApiError::DuplicateEmotion(data.name));
    }

    let emotion = state.storage.create_emotion(data).await?;
    state
        .broadcaster
        .publish_to_all(ContentEvent::EmotionCreated(emotion.clone()));
    Ok((StatusCode::CREATED, Json(emotion)))
}

/// `PUT /api/admin/emotions/{id}` — Partial update of an active emotion.
///
/// Unlike verses, updating does not revive a soft-deleted row.
///
/// # Errors
///
/// Returns [`ApiError::EmotionNotFound`] for unknown or soft-deleted IDs
/// and [`ApiError::DuplicateEmotion`] when a rename collides with another
/// active emotion.
#[utoipa::path(
    put,
    path = "/api/admin/emotions/{id}",
    tag = "Emotions",
    summary = "Update an emotion",
    params(("id" = Uuid, Path, description = "Emotion identifier")),
    request_body = EmotionUpdate,
    responses(
        (status = 200, description = "Updated emotion", body = Emotion),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Emotion not found", body = ErrorResponse),
        (status = 409, description = "Name already in active use", body = ErrorResponse),
    )
)]
pub async fn update_emotion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<EmotionUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(name) = &update.name {
        if let Some(existing) = state.storage.get_emotion_by_name(name).await? {
            if existing.id != id {
                return Err(ApiError::DuplicateEmotion(name.clone()));
            }
        }
    }

    let emotion = state
        .storage
        .update_emotion(id, update)
        .await?
        .ok_or(ApiError::EmotionNotFound(id))?;
    state
        .broadcaster
        .publish_to_all(ContentEvent::EmotionUpdated(emotion.clone()));
    Ok(Json(emotion))
}

/// `DELETE /api/admin/emotions/{id}` — Soft-delete an emotion.
///
/// Verses tagged with it stay active; public emotion-scoped reads for the
/// name start failing validation instead.
///
/// # Errors
///
/// Returns [`ApiError::EmotionNotFound`] if the ID matches nothing.
#[utoipa::path(
    delete,
    path = "/api/admin/emotions/{id}",
    tag = "Emotions",
    summary = "Soft-delete an emotion",
    params(("id" = Uuid, Path, description = "Emotion identifier")),
    responses(
        (status = 200, description = "Emotion hidden and its name freed", body = MessageResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Emotion not found", body = ErrorResponse),
    )
)]
pub async fn delete_emotion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.storage.delete_emotion(id).await? {
        return Err(ApiError::EmotionNotFound(id));
    }
    state
        .broadcaster
        .publish_to_all(ContentEvent::EmotionDeleted { id });
    Ok(Json(MessageResponse {
        message: "emotion deleted".to_string(),
    }))
}

/// Emotion CRUD routes, mounted behind the session gate.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/emotions", get(list_emotions))
        .route("/admin/emotions", post(create_emotion))
        .route("/admin/emotions/{id}", get(get_emotion))
        .route("/admin/emotions/{id}", put(update_emotion))
        .route("/admin/emotions/{id}", delete(delete_emotion))
}
