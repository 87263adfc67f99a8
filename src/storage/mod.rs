//! Storage layer: a single async contract with two interchangeable
//! backends.
//!
//! The [`Storage`] trait is the boundary the API layer talks to. Two
//! implementations satisfy it with identical semantics: a durable
//! PostgreSQL backend ([`postgres::PostgresStorage`]) and an in-memory
//! fallback ([`memory::MemoryStorage`]). The backend is chosen once at
//! startup by [`connect`], keyed on `DATABASE_URL` presence; there is no
//! runtime switching.
//!
//! "Not found" is modeled as `Ok(None)` / `Ok(false)`, never as an error.
//! Backend unavailability surfaces as [`ApiError::Storage`].

pub mod memory;
pub mod postgres;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::password;
use crate::config::GatewayConfig;
use crate::domain::{
    Admin, DashboardStats, Emotion, EmotionStat, EmotionUpdate, NewAdmin, NewEmotion,
    NewInteraction, NewVerse, Verse, VerseInteraction, VerseUpdate,
};
use crate::error::ApiError;

/// Uniform async contract over the backing store.
///
/// All list operations return empty collections, not errors, when nothing
/// matches. Soft deletes set `is_active = false` and never remove rows.
#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Returns active verses tagged with `emotion`, creation order preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_verses_by_emotion(&self, emotion: &str) -> Result<Vec<Verse>, ApiError>;

    /// Picks one active verse for `emotion` uniformly at random, or `None`
    /// when the active set is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_random_verse_by_emotion(&self, emotion: &str)
    -> Result<Option<Verse>, ApiError>;

    /// Returns all active verses, newest-updated first (public view).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_all_verses(&self) -> Result<Vec<Verse>, ApiError>;

    /// Returns every verse including soft-deleted ones, newest-updated
    /// first (administrative view).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_all_verses_for_admin(&self) -> Result<Vec<Verse>, ApiError>;

    /// Looks up an active verse by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_verse_by_id(&self, id: Uuid) -> Result<Option<Verse>, ApiError>;

    /// Inserts a new active verse with server-assigned ID and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn create_verse(&self, data: NewVerse) -> Result<Verse, ApiError>;

    /// Merges `update` into the verse, forcing `is_active = true` (an
    /// update revives a soft-deleted verse) and refreshing `updated_at`.
    /// `None` signals "not found".
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn update_verse(&self, id: Uuid, update: VerseUpdate)
    -> Result<Option<Verse>, ApiError>;

    /// Soft-deletes a verse; returns whether a row was found and updated.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn delete_verse(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Returns active emotions, ascending `sort_order`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_all_emotions(&self) -> Result<Vec<Emotion>, ApiError>;

    /// Looks up an active emotion by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_emotion_by_id(&self, id: Uuid) -> Result<Option<Emotion>, ApiError>;

    /// Looks up an active emotion by key name. Soft-deleted emotions do
    /// not match, which is what frees their names for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_emotion_by_name(&self, name: &str) -> Result<Option<Emotion>, ApiError>;

    /// Inserts a new active emotion. Name uniqueness against the active
    /// set is the caller's responsibility (the API layer checks it).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn create_emotion(&self, data: NewEmotion) -> Result<Emotion, ApiError>;

    /// Merges `update` into an *active* emotion. Soft-deleted emotions are
    /// treated as not found — updating does not revive them.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn update_emotion(
        &self,
        id: Uuid,
        update: EmotionUpdate,
    ) -> Result<Option<Emotion>, ApiError>;

    /// Soft-deletes an emotion; returns whether a row was found and updated.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn delete_emotion(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Creates an admin, hashing the plaintext password internally.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable,
    /// or [`ApiError::Internal`] if password hashing fails.
    async fn create_admin(&self, data: NewAdmin) -> Result<Admin, ApiError>;

    /// Looks up an active admin by username.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>, ApiError>;

    /// Looks up an active admin by email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError>;

    /// Verifies a plaintext password against a stored PHC hash. One-way:
    /// plaintext is never stored or logged.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the stored hash cannot be parsed.
    fn verify_admin_password(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        password::verify_password(password, hash)
    }

    /// Stamps `last_login_at` with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn update_admin_last_login(&self, id: Uuid) -> Result<(), ApiError>;

    /// Appends an interaction event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn record_interaction(
        &self,
        data: NewInteraction,
    ) -> Result<VerseInteraction, ApiError>;

    /// Returns the most recent interactions, newest first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_verse_interactions(
        &self,
        limit: usize,
    ) -> Result<Vec<VerseInteraction>, ApiError>;

    /// Returns per-day emotion rollups within the optional date bounds.
    /// No write path in this service populates them; typically empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_emotion_stats(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<EmotionStat>, ApiError>;

    /// Computes the dashboard aggregate by scanning all interactions at
    /// call time. Acceptable at this system's expected scale; deliberately
    /// not pre-aggregated.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing store is unreachable.
    async fn get_dashboard_stats(&self) -> Result<DashboardStats, ApiError>;
}

/// Selects and initializes the storage backend.
///
/// PostgreSQL when `DATABASE_URL` is configured (schema is bootstrapped
/// idempotently), the in-memory fallback otherwise.
///
/// # Errors
///
/// Returns an error if the database is unreachable or schema bootstrap
/// fails.
pub async fn connect(config: &GatewayConfig) -> anyhow::Result<Arc<dyn Storage>> {
    match &config.database_url {
        Some(url) => {
            let storage = postgres::PostgresStorage::connect(url, config).await?;
            storage.init_schema().await?;
            tracing::info!("using PostgreSQL storage");
            Ok(Arc::new(storage))
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory storage");
            Ok(Arc::new(memory::MemoryStorage::new()))
        }
    }
}
