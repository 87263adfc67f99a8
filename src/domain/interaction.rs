//! Interaction analytics: append-only events and dashboard aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An analytics event recording a user action against a verse.
///
/// Append-only: interactions are never mutated or deleted, and soft-deleting
/// the referenced verse does not retroactively alter them. Used only in
/// aggregate for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerseInteraction {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// Verse the action targeted.
    pub verse_id: Uuid,
    /// Emotion the user had selected.
    pub emotion: String,
    /// Action label (`"verse_drawn"`, `"viewed"`, `"shared"`).
    pub action: String,
    /// Optional client session identifier.
    pub session_id: Option<String>,
    /// Optional user-agent string.
    pub user_agent: Option<String>,
    /// Optional client IP.
    pub ip_address: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an interaction.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewInteraction {
    /// Verse the action targeted.
    pub verse_id: Uuid,
    /// Emotion the user had selected.
    pub emotion: String,
    /// Action label.
    pub action: String,
    /// Optional client session identifier.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Optional user-agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional client IP.
    #[serde(default)]
    pub ip_address: Option<String>,
}

impl VerseInteraction {
    /// Builds a timestamped interaction from an insert payload.
    #[must_use]
    pub fn from_new(data: NewInteraction) -> Self {
        Self {
            id: Uuid::new_v4(),
            verse_id: data.verse_id,
            emotion: data.emotion,
            action: data.action,
            session_id: data.session_id,
            user_agent: data.user_agent,
            ip_address: data.ip_address,
            created_at: Utc::now(),
        }
    }
}

/// Per-emotion interaction count for the dashboard's popularity ranking.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmotionCount {
    /// Emotion name.
    pub emotion: String,
    /// Number of interactions recorded for it.
    pub count: u64,
}

/// Aggregate dashboard snapshot, recomputed by a full scan on every call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Count of active verses.
    pub total_verses: u64,
    /// Count of all interactions ever recorded.
    pub total_interactions: u64,
    /// Top five emotions by interaction count, descending; ties keep
    /// first-seen order.
    pub popular_emotions: Vec<EmotionCount>,
    /// The ten most recent interactions, newest first.
    pub recent_interactions: Vec<VerseInteraction>,
}

/// Per-emotion, per-day interaction rollup.
///
/// Present in the schema contract but not populated by any write path in
/// this service; exposed as a derived reporting view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmotionStat {
    /// Row identifier.
    pub id: Uuid,
    /// Emotion name.
    pub emotion: String,
    /// Day the rollup covers.
    pub date: DateTime<Utc>,
    /// Views that day.
    pub view_count: i32,
    /// Shares that day.
    pub share_count: i32,
    /// All interactions that day.
    pub total_interactions: i32,
}
