//! Request/response DTOs shared across endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::AdminProfile;

/// Login request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Admin username.
    pub username: String,
    /// Plaintext password, verified against the stored hash and discarded.
    pub password: String,
}

/// Successful login/registration response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The authenticated admin, without the password hash.
    pub admin: AdminProfile,
}

/// Generic message-only response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

/// Query parameters for the admin interaction listing.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct InteractionQuery {
    /// Maximum number of interactions to return. Defaults to 100.
    #[serde(default = "default_interaction_limit")]
    pub limit: usize,
}

fn default_interaction_limit() -> usize {
    100
}

/// Query parameters for the emotion stats report.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    /// Inclusive lower bound (RFC 3339).
    #[serde(default)]
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Inclusive upper bound (RFC 3339).
    #[serde(default)]
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}
