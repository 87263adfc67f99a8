//! Verse entity and its insert/update inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A curated spiritual text bundle tied to one emotion.
///
/// Verses are soft-deleted: `is_active = false` removes a verse from every
/// public read while keeping it visible to the administrative listing. Rows
/// are never physically removed.
///
/// JSON fields are camelCase for compatibility with the web client.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// Emotion tag; references [`super::Emotion::name`] by value.
    pub emotion: String,
    /// Source-language (Sanskrit) text.
    pub sanskrit: String,
    /// Hindi translation.
    pub hindi: String,
    /// English translation.
    pub english: String,
    /// Guidance explaining the verse in the context of the emotion.
    pub explanation: String,
    /// Reference citation (e.g. `"Bhagavad Gita 2.48"`).
    pub chapter: String,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp; public listings order by this, newest first.
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new verse. Identifier, timestamps, and the active
/// flag are server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewVerse {
    /// Emotion tag the verse belongs to.
    pub emotion: String,
    /// Source-language (Sanskrit) text.
    pub sanskrit: String,
    /// Hindi translation.
    pub hindi: String,
    /// English translation.
    pub english: String,
    /// Guidance explaining the verse.
    pub explanation: String,
    /// Reference citation.
    pub chapter: String,
}

/// Partial update for a verse. Only present fields are merged.
///
/// Updating a verse always sets `is_active = true`: an update revives a
/// soft-deleted verse. This mirrors the long-standing admin-console
/// behavior and is relied on as the "reactivate" path.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VerseUpdate {
    /// Replacement emotion tag.
    pub emotion: Option<String>,
    /// Replacement Sanskrit text.
    pub sanskrit: Option<String>,
    /// Replacement Hindi translation.
    pub hindi: Option<String>,
    /// Replacement English translation.
    pub english: Option<String>,
    /// Replacement explanation.
    pub explanation: Option<String>,
    /// Replacement citation.
    pub chapter: Option<String>,
}

impl Verse {
    /// Builds a fresh active verse from an insert payload.
    #[must_use]
    pub fn from_new(data: NewVerse) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            emotion: data.emotion,
            sanskrit: data.sanskrit,
            hindi: data.hindi,
            english: data.english,
            explanation: data.explanation,
            chapter: data.chapter,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a partial update into this verse, reviving it and refreshing
    /// `updated_at`.
    pub fn apply_update(&mut self, update: VerseUpdate) {
        if let Some(emotion) = update.emotion {
            self.emotion = emotion;
        }
        if let Some(sanskrit) = update.sanskrit {
            self.sanskrit = sanskrit;
        }
        if let Some(hindi) = update.hindi {
            self.hindi = hindi;
        }
        if let Some(english) = update.english {
            self.english = english;
        }
        if let Some(explanation) = update.explanation {
            self.explanation = explanation;
        }
        if let Some(chapter) = update.chapter {
            self.chapter = chapter;
        }
        self.is_active = true;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn sample() -> NewVerse {
        NewVerse {
            emotion: "happy".to_string(),
            sanskrit: "योगः कर्मसु कौशलम्".to_string(),
            hindi: "कर्मों में कुशलता ही योग है".to_string(),
            english: "Yoga is skill in action".to_string(),
            explanation: "Skillful action leads to growth".to_string(),
            chapter: "Bhagavad Gita 2.50".to_string(),
        }
    }

    #[test]
    fn from_new_is_active() {
        let verse = Verse::from_new(sample());
        assert!(verse.is_active);
        assert_eq!(verse.emotion, "happy");
    }

    #[test]
    fn apply_update_revives_and_merges() {
        let mut verse = Verse::from_new(sample());
        verse.is_active = false;

        verse.apply_update(VerseUpdate {
            english: Some("Yoga is excellence in action".to_string()),
            ..VerseUpdate::default()
        });

        assert!(verse.is_active);
        assert_eq!(verse.english, "Yoga is excellence in action");
        // Untouched fields survive the merge.
        assert_eq!(verse.chapter, "Bhagavad Gita 2.50");
    }

    #[test]
    fn serializes_camel_case() {
        let verse = Verse::from_new(sample());
        let json = serde_json::to_string(&verse).unwrap_or_default();
        assert!(json.contains("\"isActive\":true"));
        assert!(json.contains("\"createdAt\""));
    }
}
