//! Public read endpoints and interaction recording.
//!
//! Every endpoint taking an `emotion` path parameter validates it against
//! the *current* active emotion set — emotions are administrator-managed,
//! so this is a live lookup on each request, never a static list.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::app_state::AppState;
use crate::domain::{ContentEvent, Emotion, NewInteraction, Verse, VerseInteraction};
use crate::error::{ApiError, ErrorResponse};

/// Rejects `emotion` unless it names a currently active emotion.
async fn ensure_active_emotion(state: &AppState, emotion: &str) -> Result<(), ApiError> {
    let active = state.storage.get_all_emotions().await?;
    if active.iter().any(|e| e.name == emotion) {
        Ok(())
    } else {
        Err(ApiError::UnknownEmotion(emotion.to_string()))
    }
}

/// Pushes the interaction and a recomputed stats snapshot to admin
/// subscribers. Best-effort: runs after the mutation is committed and any
/// failure is logged, never surfaced to the caller.
async fn notify_admins_of_interaction(state: &AppState, interaction: &VerseInteraction) {
    state
        .broadcaster
        .publish_to_admins(ContentEvent::NewInteraction(interaction.clone()));

    match state.storage.get_dashboard_stats().await {
        Ok(stats) => {
            state
                .broadcaster
                .publish_to_admins(ContentEvent::StatsUpdate(stats));
        }
        Err(error) => {
            tracing::error!(%error, "failed to broadcast stats update");
        }
    }
}

/// `GET /api/emotions` — Active emotions in display order.
///
/// # Errors
///
/// Returns [`ApiError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/emotions",
    tag = "Public",
    summary = "List active emotions",
    responses(
        (status = 200, description = "Active emotions, sort order ascending", body = Vec<Emotion>),
    )
)]
pub async fn list_emotions(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let emotions = state.storage.get_all_emotions().await?;
    Ok(Json(emotions))
}

/// `GET /api/verses` — All active verses.
///
/// # Errors
///
/// Returns [`ApiError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/verses",
    tag = "Public",
    summary = "List active verses",
    responses(
        (status = 200, description = "Active verses, newest-updated first", body = Vec<Verse>),
    )
)]
pub async fn list_verses(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let verses = state.storage.get_all_verses().await?;
    Ok(Json(verses))
}

/// `GET /api/verses/{emotion}` — Active verses for one emotion.
///
/// # Errors
///
/// Returns [`ApiError::UnknownEmotion`] if the emotion is not currently
/// active.
#[utoipa::path(
    get,
    path = "/api/verses/{emotion}",
    tag = "Public",
    summary = "List verses for an emotion",
    params(("emotion" = String, Path, description = "Active emotion name")),
    responses(
        (status = 200, description = "Matching active verses", body = Vec<Verse>),
        (status = 400, description = "Unknown emotion", body = ErrorResponse),
    )
)]
pub async fn verses_by_emotion(
    State(state): State<AppState>,
    Path(emotion): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_active_emotion(&state, &emotion).await?;
    let verses = state.storage.get_verses_by_emotion(&emotion).await?;
    Ok(Json(verses))
}

/// Extra context recorded alongside a random draw.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DrawParams {
    /// Optional client session identifier for the interaction record.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `GET /api/verses/{emotion}/random` — Draw one verse uniformly at random.
///
/// Records a `verse_drawn` interaction and notifies admin subscribers.
///
/// # Errors
///
/// Returns [`ApiError::UnknownEmotion`] for inactive emotions and
/// [`ApiError::NoVersesForEmotion`] when the emotion has no active verses.
#[utoipa::path(
    get,
    path = "/api/verses/{emotion}/random",
    tag = "Public",
    summary = "Draw a random verse",
    params(("emotion" = String, Path, description = "Active emotion name"), DrawParams),
    responses(
        (status = 200, description = "One verse, uniformly random over the active set", body = Verse),
        (status = 400, description = "Unknown emotion", body = ErrorResponse),
        (status = 404, description = "No active verses for this emotion", body = ErrorResponse),
    )
)]
pub async fn random_verse(
    State(state): State<AppState>,
    Path(emotion): Path<String>,
    Query(params): Query<DrawParams>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    ensure_active_emotion(&state, &emotion).await?;

    let verse = state
        .storage
        .get_random_verse_by_emotion(&emotion)
        .await?
        .ok_or_else(|| ApiError::NoVersesForEmotion(emotion.clone()))?;

    // The draw itself is an analytics event. The verse is already chosen,
    // so a recording failure is logged but does not cost the user their
    // verse.
    let record = NewInteraction {
        verse_id: verse.id,
        emotion: emotion.clone(),
        action: "verse_drawn".to_string(),
        session_id: params.session_id,
        user_agent: header_string(&headers, header::USER_AGENT.as_str()),
        ip_address: header_string(&headers, "x-forwarded-for"),
    };
    match state.storage.record_interaction(record).await {
        Ok(interaction) => notify_admins_of_interaction(&state, &interaction).await,
        Err(error) => tracing::error!(%error, "failed to record verse draw"),
    }

    Ok(Json(verse))
}

/// `POST /api/interactions` — Record a user interaction.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the action label is empty.
#[utoipa::path(
    post,
    path = "/api/interactions",
    tag = "Public",
    summary = "Record an interaction",
    request_body = NewInteraction,
    responses(
        (status = 201, description = "Interaction recorded", body = VerseInteraction),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
    )
)]
pub async fn record_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut data): Json<NewInteraction>,
) -> Result<impl IntoResponse, ApiError> {
    if data.action.trim().is_empty() {
        return Err(ApiError::Validation("action must not be empty".to_string()));
    }
    if data.user_agent.is_none() {
        data.user_agent = header_string(&headers, header::USER_AGENT.as_str());
    }
    if data.ip_address.is_none() {
        data.ip_address = header_string(&headers, "x-forwarded-for");
    }

    let interaction = state.storage.record_interaction(data).await?;
    notify_admins_of_interaction(&state, &interaction).await;

    Ok((StatusCode::CREATED, Json(interaction)))
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

/// Public routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/emotions", get(list_emotions))
        .route("/verses", get(list_verses))
        .route("/verses/{emotion}", get(verses_by_emotion))
        .route("/verses/{emotion}/random", get(random_verse))
        .route("/interactions", post(record_interaction))
}
