//! Emotion taxonomy entity and its insert/update inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A named emotion category used to filter verses.
///
/// `name` is the key verses reference; it must be unique among *active*
/// emotions. Soft-deleting an emotion frees its name for reuse. Display
/// ordering is ascending `sort_order`, ties broken arbitrarily.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Emotion {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// Unique key name (e.g. `"happy"`); referenced by [`super::Verse::emotion`].
    pub name: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Short description shown on the selection screen.
    pub description: String,
    /// Presentation hint: hex color.
    pub color: String,
    /// Presentation hint: icon glyph.
    pub icon: String,
    /// Presentation hint: emoji.
    pub emoji: String,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Ascending display sequence.
    pub sort_order: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new emotion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmotion {
    /// Unique key name.
    pub name: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Short description.
    pub description: String,
    /// Presentation hint: hex color.
    pub color: String,
    /// Presentation hint: icon glyph.
    pub icon: String,
    /// Presentation hint: emoji.
    pub emoji: String,
    /// Display sequence; defaults to 0.
    #[serde(default)]
    pub sort_order: i32,
}

/// Partial update for an emotion. Only present fields are merged.
///
/// Unlike verses, updating does not revive a soft-deleted emotion — an
/// inactive emotion is treated as not found.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EmotionUpdate {
    /// Replacement key name (subject to the active-uniqueness check).
    pub name: Option<String>,
    /// Replacement display name.
    pub display_name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement color.
    pub color: Option<String>,
    /// Replacement icon.
    pub icon: Option<String>,
    /// Replacement emoji.
    pub emoji: Option<String>,
    /// Replacement sort order.
    pub sort_order: Option<i32>,
}

impl Emotion {
    /// Builds a fresh active emotion from an insert payload.
    #[must_use]
    pub fn from_new(data: NewEmotion) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            display_name: data.display_name,
            description: data.description,
            color: data.color,
            icon: data.icon,
            emoji: data.emoji,
            is_active: true,
            sort_order: data.sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a partial update into this emotion and refreshes `updated_at`.
    pub fn apply_update(&mut self, update: EmotionUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(display_name) = update.display_name {
            self.display_name = display_name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(icon) = update.icon {
            self.icon = icon;
        }
        if let Some(emoji) = update.emoji {
            self.emoji = emoji;
        }
        if let Some(sort_order) = update.sort_order {
            self.sort_order = sort_order;
        }
        self.updated_at = Utc::now();
    }
}
