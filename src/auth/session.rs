//! In-process admin session store with fixed TTL.
//!
//! Session records live in a shared map keyed by an opaque UUID carried in
//! the `session` cookie. Expiry is the store's responsibility: expired
//! records are evicted when touched and treated as absent. Single-process
//! only, like the rest of the gateway.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// A server-side session record established by a successful login.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// The authenticated admin's identifier.
    pub admin_id: Uuid,
    /// The authenticated admin's username.
    pub username: String,
    /// Instant after which the record is treated as absent.
    pub expires_at: DateTime<Utc>,
}

/// Shared store of active admin sessions.
///
/// Cheap to clone; all clones share the same map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    records: Arc<RwLock<HashMap<Uuid, SessionRecord>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates a store whose sessions expire `ttl_hours` after creation.
    #[must_use]
    pub fn new(ttl_hours: u64) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::hours(i64::try_from(ttl_hours).unwrap_or(24)),
        }
    }

    /// Establishes a session for an admin and returns its cookie value.
    pub async fn create(&self, admin_id: Uuid, username: &str) -> Uuid {
        let session_id = Uuid::new_v4();
        let record = SessionRecord {
            admin_id,
            username: username.to_string(),
            expires_at: Utc::now() + self.ttl,
        };
        self.records.write().await.insert(session_id, record);
        session_id
    }

    /// Returns the session record if it exists and has not expired.
    /// Expired records are evicted on touch.
    pub async fn validate(&self, session_id: Uuid) -> Option<SessionRecord> {
        {
            let records = self.records.read().await;
            match records.get(&session_id) {
                Some(record) if record.expires_at > Utc::now() => return Some(record.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: drop the record.
        self.records.write().await.remove(&session_id);
        None
    }

    /// Destroys a session; subsequent validation fails.
    pub async fn destroy(&self, session_id: Uuid) {
        self.records.write().await.remove(&session_id);
    }

    /// Seconds until a freshly created session expires. Used for the
    /// cookie `Max-Age`.
    #[must_use]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Builds the `Set-Cookie` value issued on login.
    #[must_use]
    pub fn issue_cookie(&self, session_id: Uuid) -> String {
        format!(
            "{SESSION_COOKIE}={session_id}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.ttl_secs()
        )
    }

    /// Builds the expired `Set-Cookie` value issued on logout.
    #[must_use]
    pub fn clear_cookie() -> String {
        format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
    }
}

/// Extracts the session ID from a `Cookie` header value.
#[must_use]
pub fn session_id_from_cookie_header(header: &str) -> Option<Uuid> {
    header.split(';').find_map(|part| {
        part.trim()
            .strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .and_then(|value| value.parse().ok())
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_validate() {
        let store = SessionStore::new(24);
        let admin_id = Uuid::new_v4();
        let session_id = store.create(admin_id, "keeper").await;

        let record = store.validate(session_id).await;
        let Some(record) = record else {
            panic!("fresh session should validate");
        };
        assert_eq!(record.admin_id, admin_id);
        assert_eq!(record.username, "keeper");
    }

    #[tokio::test]
    async fn unknown_session_is_absent() {
        let store = SessionStore::new(24);
        assert!(store.validate(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn destroy_invalidates() {
        let store = SessionStore::new(24);
        let session_id = store.create(Uuid::new_v4(), "keeper").await;
        store.destroy(session_id).await;
        assert!(store.validate(session_id).await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_sessions_expire_immediately() {
        let store = SessionStore::new(0);
        let session_id = store.create(Uuid::new_v4(), "keeper").await;
        assert!(store.validate(session_id).await.is_none());
        // And the record was evicted, not just hidden.
        assert!(store.validate(session_id).await.is_none());
    }

    #[test]
    fn cookie_parsing() {
        let id = Uuid::new_v4();
        let header = format!("theme=dark; session={id}; lang=en");
        assert_eq!(session_id_from_cookie_header(&header), Some(id));
        assert_eq!(session_id_from_cookie_header("theme=dark"), None);
        assert_eq!(session_id_from_cookie_header("session=not-a-uuid"), None);
    }

    #[test]
    fn issued_cookie_shape() {
        let store = SessionStore::new(24);
        let id = Uuid::new_v4();
        let cookie = store.issue_cookie(id);
        assert!(cookie.starts_with(&format!("session={id}")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
    }
}
