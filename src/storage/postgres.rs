//! PostgreSQL storage backend using `sqlx::PgPool`.
//!
//! Schema is bootstrapped idempotently at startup via
//! [`PostgresStorage::init_schema`]; uniqueness of emotion names is
//! enforced only among active rows (a partial unique index), which is what
//! lets a soft-deleted emotion's name be reused.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::Storage;
use crate::auth::password;
use crate::config::GatewayConfig;
use crate::domain::{
    Admin, DashboardStats, Emotion, EmotionCount, EmotionStat, EmotionUpdate, NewAdmin,
    NewEmotion, NewInteraction, NewVerse, Verse, VerseInteraction, VerseUpdate,
};
use crate::error::ApiError;

const VERSE_COLS: &str =
    "id, emotion, sanskrit, hindi, english, explanation, chapter, is_active, created_at, updated_at";
const EMOTION_COLS: &str =
    "id, name, display_name, description, color, icon, emoji, is_active, sort_order, created_at, updated_at";
const ADMIN_COLS: &str =
    "id, username, email, password_hash, role, is_active, created_at, last_login_at";
const INTERACTION_COLS: &str =
    "id, verse_id, emotion, action, session_id, user_agent, ip_address, created_at";

type VerseRow = (
    Uuid,
    String,
    String,
    String,
    String,
    String,
    String,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
);

type EmotionRow = (
    Uuid,
    String,
    String,
    String,
    String,
    String,
    String,
    bool,
    i32,
    DateTime<Utc>,
    DateTime<Utc>,
);

type AdminRow = (
    Uuid,
    String,
    String,
    String,
    String,
    bool,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

type InteractionRow = (
    Uuid,
    Uuid,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
);

fn verse_from_row(row: VerseRow) -> Verse {
    let (id, emotion, sanskrit, hindi, english, explanation, chapter, is_active, created_at, updated_at) =
        row;
    Verse {
        id,
        emotion,
        sanskrit,
        hindi,
        english,
        explanation,
        chapter,
        is_active,
        created_at,
        updated_at,
    }
}

fn emotion_from_row(row: EmotionRow) -> Emotion {
    let (id, name, display_name, description, color, icon, emoji, is_active, sort_order, created_at, updated_at) =
        row;
    Emotion {
        id,
        name,
        display_name,
        description,
        color,
        icon,
        emoji,
        is_active,
        sort_order,
        created_at,
        updated_at,
    }
}

fn admin_from_row(row: AdminRow) -> Admin {
    let (id, username, email, password_hash, role, is_active, created_at, last_login_at) = row;
    Admin {
        id,
        username,
        email,
        password_hash,
        role,
        is_active,
        created_at,
        last_login_at,
    }
}

fn interaction_from_row(row: InteractionRow) -> VerseInteraction {
    let (id, verse_id, emotion, action, session_id, user_agent, ip_address, created_at) = row;
    VerseInteraction {
        id,
        verse_id,
        emotion,
        action,
        session_id,
        user_agent,
        ip_address,
        created_at,
    }
}

fn storage_err(e: sqlx::Error) -> ApiError {
    ApiError::Storage(e.to_string())
}

/// PostgreSQL-backed implementation of [`Storage`].
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connects a pool using the configured limits.
    ///
    /// # Errors
    ///
    /// Returns a [`sqlx::Error`] if the database is unreachable.
    pub async fn connect(url: &str, config: &GatewayConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool (used by tests and tooling).
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the tables and indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn init_schema(&self) -> Result<(), ApiError> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS verses (
                id UUID PRIMARY KEY,
                emotion TEXT NOT NULL,
                sanskrit TEXT NOT NULL,
                hindi TEXT NOT NULL,
                english TEXT NOT NULL,
                explanation TEXT NOT NULL,
                chapter TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            "CREATE TABLE IF NOT EXISTS emotions (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                display_name TEXT NOT NULL,
                description TEXT NOT NULL,
                color TEXT NOT NULL,
                icon TEXT NOT NULL,
                emoji TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            // Names must be unique only among active emotions so a
            // soft-deleted name can be reused.
            "CREATE UNIQUE INDEX IF NOT EXISTS emotions_active_name_idx
                ON emotions (name) WHERE is_active",
            "CREATE TABLE IF NOT EXISTS admins (
                id UUID PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'admin',
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_login_at TIMESTAMPTZ
            )",
            "CREATE TABLE IF NOT EXISTS verse_interactions (
                id UUID PRIMARY KEY,
                verse_id UUID NOT NULL,
                emotion TEXT NOT NULL,
                action TEXT NOT NULL,
                session_id TEXT,
                user_agent TEXT,
                ip_address TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            "CREATE TABLE IF NOT EXISTS emotion_stats (
                id UUID PRIMARY KEY,
                emotion TEXT NOT NULL,
                date TIMESTAMPTZ NOT NULL,
                view_count INTEGER NOT NULL DEFAULT 0,
                share_count INTEGER NOT NULL DEFAULT 0,
                total_interactions INTEGER NOT NULL DEFAULT 0
            )",
        ];
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(storage_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn get_verses_by_emotion(&self, emotion: &str) -> Result<Vec<Verse>, ApiError> {
        let rows = sqlx::query_as::<_, VerseRow>(&format!(
            "SELECT {VERSE_COLS} FROM verses WHERE emotion = $1 AND is_active ORDER BY created_at ASC",
        ))
        .bind(emotion)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(rows.into_iter().map(verse_from_row).collect())
    }

    async fn get_random_verse_by_emotion(
        &self,
        emotion: &str,
    ) -> Result<Option<Verse>, ApiError> {
        let row = sqlx::query_as::<_, VerseRow>(&format!(
            "SELECT {VERSE_COLS} FROM verses WHERE emotion = $1 AND is_active ORDER BY random() LIMIT 1",
        ))
        .bind(emotion)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(row.map(verse_from_row))
    }

    async fn get_all_verses(&self) -> Result<Vec<Verse>, ApiError> {
        let rows = sqlx::query_as::<_, VerseRow>(&format!(
            "SELECT {VERSE_COLS} FROM verses WHERE is_active ORDER BY updated_at DESC",
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(rows.into_iter().map(verse_from_row).collect())
    }

    async fn get_all_verses_for_admin(&self) -> Result<Vec<Verse>, ApiError> {
        let rows = sqlx::query_as::<_, VerseRow>(&format!(
            "SELECT {VERSE_COLS} FROM verses ORDER BY updated_at DESC",
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(rows.into_iter().map(verse_from_row).collect())
    }

    async fn get_verse_by_id(&self, id: Uuid) -> Result<Option<Verse>, ApiError> {
        let row = sqlx::query_as::<_, VerseRow>(&format!(
            "SELECT {VERSE_COLS} FROM verses WHERE id = $1 AND is_active",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(row.map(verse_from_row))
    }

    async fn create_verse(&self, data: NewVerse) -> Result<Verse, ApiError> {
        let row = sqlx::query_as::<_, VerseRow>(&format!(
            "INSERT INTO verses (id, emotion, sanskrit, hindi, english, explanation, chapter, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NOW(), NOW()) RETURNING {VERSE_COLS}",
        ))
        .bind(Uuid::new_v4())
        .bind(&data.emotion)
        .bind(&data.sanskrit)
        .bind(&data.hindi)
        .bind(&data.english)
        .bind(&data.explanation)
        .bind(&data.chapter)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(verse_from_row(row))
    }

    async fn update_verse(
        &self,
        id: Uuid,
        update: VerseUpdate,
    ) -> Result<Option<Verse>, ApiError> {
        // COALESCE merges partial fields; the unconditional is_active = TRUE
        // is the revive-on-update rule.
        let row = sqlx::query_as::<_, VerseRow>(&format!(
            "UPDATE verses SET \
                emotion = COALESCE($2, emotion), \
                sanskrit = COALESCE($3, sanskrit), \
                hindi = COALESCE($4, hindi), \
                english = COALESCE($5, english), \
                explanation = COALESCE($6, explanation), \
                chapter = COALESCE($7, chapter), \
                is_active = TRUE, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {VERSE_COLS}",
        ))
        .bind(id)
        .bind(update.emotion)
        .bind(update.sanskrit)
        .bind(update.hindi)
        .bind(update.english)
        .bind(update.explanation)
        .bind(update.chapter)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(row.map(verse_from_row))
    }

    async fn delete_verse(&self, id: Uuid) -> Result<bool, ApiError> {
        let result =
            sqlx::query("UPDATE verses SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(storage_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_all_emotions(&self) -> Result<Vec<Emotion>, ApiError> {
        let rows = sqlx::query_as::<_, EmotionRow>(&format!(
            "SELECT {EMOTION_COLS} FROM emotions WHERE is_active ORDER BY sort_order ASC",
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(rows.into_iter().map(emotion_from_row).collect())
    }

    async fn get_emotion_by_id(&self, id: Uuid) -> Result<Option<Emotion>, ApiError> {
        let row = sqlx::query_as::<_, EmotionRow>(&format!(
            "SELECT {EMOTION_COLS} FROM emotions WHERE id = $1 AND is_active",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(row.map(emotion_from_row))
    }

    async fn get_emotion_by_name(&self, name: &str) -> Result<Option<Emotion>, ApiError> {
        let row = sqlx::query_as::<_, EmotionRow>(&format!(
            "SELECT {EMOTION_COLS} FROM emotions WHERE name = $1 AND is_active",
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(row.map(emotion_from_row))
    }

    async fn create_emotion(&self, data: NewEmotion) -> Result<Emotion, ApiError> {
        let row = sqlx::query_as::<_, EmotionRow>(&format!(
            "INSERT INTO emotions (id, name, display_name, description, color, icon, emoji, is_active, sort_order, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, NOW(), NOW()) RETURNING {EMOTION_COLS}",
        ))
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.display_name)
        .bind(&data.description)
        .bind(&data.color)
        .bind(&data.icon)
        .bind(&data.emoji)
        .bind(data.sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(emotion_from_row(row))
    }

    async fn update_emotion(
        &self,
        id: Uuid,
        update: EmotionUpdate,
    ) -> Result<Option<Emotion>, ApiError> {
        // The is_active guard means a soft-deleted emotion is not found
        // here and is never revived by an update.
        let row = sqlx::query_as::<_, EmotionRow>(&format!(
            "UPDATE emotions SET \
                name = COALESCE($2, name), \
                display_name = COALESCE($3, display_name), \
                description = COALESCE($4, description), \
                color = COALESCE($5, color), \
                icon = COALESCE($6, icon), \
                emoji = COALESCE($7, emoji), \
                sort_order = COALESCE($8, sort_order), \
                updated_at = NOW() \
             WHERE id = $1 AND is_active RETURNING {EMOTION_COLS}",
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.display_name)
        .bind(update.description)
        .bind(update.color)
        .bind(update.icon)
        .bind(update.emoji)
        .bind(update.sort_order)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(row.map(emotion_from_row))
    }

    async fn delete_emotion(&self, id: Uuid) -> Result<bool, ApiError> {
        let result =
            sqlx::query("UPDATE emotions SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(storage_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_admin(&self, data: NewAdmin) -> Result<Admin, ApiError> {
        let password_hash = password::hash_password(&data.password)?;
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "INSERT INTO admins (id, username, email, password_hash, role, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, TRUE, NOW()) RETURNING {ADMIN_COLS}",
        ))
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(&data.email)
        .bind(&password_hash)
        .bind(data.role.as_deref().unwrap_or("admin"))
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(admin_from_row(row))
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>, ApiError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {ADMIN_COLS} FROM admins WHERE username = $1 AND is_active",
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(row.map(admin_from_row))
    }

    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {ADMIN_COLS} FROM admins WHERE email = $1 AND is_active",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(row.map(admin_from_row))
    }

    async fn update_admin_last_login(&self, id: Uuid) -> Result<(), ApiError> {
        sqlx::query("UPDATE admins SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn record_interaction(
        &self,
        data: NewInteraction,
    ) -> Result<VerseInteraction, ApiError> {
        let row = sqlx::query_as::<_, InteractionRow>(&format!(
            "INSERT INTO verse_interactions (id, verse_id, emotion, action, session_id, user_agent, ip_address, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) RETURNING {INTERACTION_COLS}",
        ))
        .bind(Uuid::new_v4())
        .bind(data.verse_id)
        .bind(&data.emotion)
        .bind(&data.action)
        .bind(data.session_id)
        .bind(data.user_agent)
        .bind(data.ip_address)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(interaction_from_row(row))
    }

    async fn get_verse_interactions(
        &self,
        limit: usize,
    ) -> Result<Vec<VerseInteraction>, ApiError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, InteractionRow>(&format!(
            "SELECT {INTERACTION_COLS} FROM verse_interactions ORDER BY created_at DESC LIMIT $1",
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(rows.into_iter().map(interaction_from_row).collect())
    }

    async fn get_emotion_stats(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<EmotionStat>, ApiError> {
        let rows = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>, i32, i32, i32)>(
            "SELECT id, emotion, date, view_count, share_count, total_interactions \
             FROM emotion_stats \
             WHERE ($1::timestamptz IS NULL OR date >= $1) \
               AND ($2::timestamptz IS NULL OR date <= $2) \
             ORDER BY date DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, emotion, date, view_count, share_count, total_interactions)| EmotionStat {
                id,
                emotion,
                date,
                view_count,
                share_count,
                total_interactions,
            })
            .collect())
    }

    async fn get_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let total_verses =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM verses WHERE is_active")
                .fetch_one(&self.pool)
                .await
                .map_err(storage_err)?;

        let total_interactions =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM verse_interactions")
                .fetch_one(&self.pool)
                .await
                .map_err(storage_err)?;

        let popular = sqlx::query_as::<_, (String, i64)>(
            "SELECT emotion, COUNT(*) AS cnt FROM verse_interactions \
             GROUP BY emotion ORDER BY cnt DESC LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let recent_interactions = self.get_verse_interactions(10).await?;

        Ok(DashboardStats {
            total_verses: u64::try_from(total_verses).unwrap_or(0),
            total_interactions: u64::try_from(total_interactions).unwrap_or(0),
            popular_emotions: popular
                .into_iter()
                .map(|(emotion, count)| EmotionCount {
                    emotion,
                    count: u64::try_from(count).unwrap_or(0),
                })
                .collect(),
            recent_interactions,
        })
    }
}
