//! Administrator principal and its public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An authenticating administrator.
///
/// The password is stored only as an argon2 PHC hash and is never
/// serialized; API responses use [`AdminProfile`]. Admins are created at
/// setup time (or via the registration endpoint) and never deleted.
#[derive(Debug, Clone)]
pub struct Admin {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Unique contact email.
    pub email: String,
    /// Argon2 PHC-format password hash.
    pub password_hash: String,
    /// Role string; `"admin"` unless specified.
    pub role: String,
    /// Active flag; inactive admins cannot log in.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Registration payload. The plaintext password is hashed inside the
/// storage layer and discarded.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAdmin {
    /// Unique login name.
    pub username: String,
    /// Unique contact email.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Role string; defaults to `"admin"`.
    #[serde(default)]
    pub role: Option<String>,
}

/// The hash-free projection of an [`Admin`] returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    /// Administrator identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Role string.
    pub role: String,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            role: admin.role.clone(),
        }
    }
}
