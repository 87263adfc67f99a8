//! Gateway error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "unknown emotion: serenity",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ApiError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                |
/// |-----------|------------------|----------------------------|
/// | 1000–1099 | Validation       | 400 Bad Request            |
/// | 1100–1199 | Authentication   | 401 Unauthorized           |
/// | 2000–2099 | Not Found        | 404 Not Found              |
/// | 2100–2199 | Conflict         | 409 Conflict               |
/// | 3000–3999 | Server / Storage | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed (missing or malformed fields).
    #[error("invalid request: {0}")]
    Validation(String),

    /// An `emotion` path argument is not in the active emotion set.
    #[error("unknown emotion: {0}")]
    UnknownEmotion(String),

    /// No valid admin session accompanies the request.
    #[error("unauthorized")]
    Unauthorized,

    /// Login failed: unknown username or wrong password. Deliberately
    /// indistinguishable from the outside.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Verse with the given ID was not found.
    #[error("verse not found: {0}")]
    VerseNotFound(uuid::Uuid),

    /// Emotion with the given ID was not found (or is soft-deleted).
    #[error("emotion not found: {0}")]
    EmotionNotFound(uuid::Uuid),

    /// Admin account was not found.
    #[error("admin not found: {0}")]
    AdminNotFound(String),

    /// The emotion exists but has no active verses to draw from.
    #[error("no verses found for emotion: {0}")]
    NoVersesForEmotion(String),

    /// An active emotion already uses this name.
    #[error("emotion with this name already exists: {0}")]
    DuplicateEmotion(String),

    /// An admin with this username already exists.
    #[error("admin already exists: {0}")]
    DuplicateAdmin(String),

    /// Backing store failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::UnknownEmotion(_) => 1002,
            Self::Unauthorized => 1100,
            Self::InvalidCredentials => 1101,
            Self::VerseNotFound(_) => 2001,
            Self::EmotionNotFound(_) => 2002,
            Self::AdminNotFound(_) => 2003,
            Self::NoVersesForEmotion(_) => 2004,
            Self::DuplicateEmotion(_) => 2101,
            Self::DuplicateAdmin(_) => 2102,
            Self::Storage(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnknownEmotion(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::VerseNotFound(_)
            | Self::EmotionNotFound(_)
            | Self::AdminNotFound(_)
            | Self::NoVersesForEmotion(_) => StatusCode::NOT_FOUND,
            Self::DuplicateEmotion(_) | Self::DuplicateAdmin(_) => StatusCode::CONFLICT,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Backing-store details are logged server-side only; the client
        // receives a generic message.
        let message = match &self {
            Self::Storage(detail) => {
                tracing::error!(%detail, "storage failure");
                "internal server error".to_string()
            }
            Self::Internal(detail) => {
                tracing::error!(%detail, "internal failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message,
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::UnknownEmotion("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::VerseNotFound(uuid::Uuid::new_v4()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::DuplicateEmotion("happy".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Storage("down".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_detail_is_not_exposed() {
        let response = ApiError::Storage("connection refused to 10.0.0.1".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
