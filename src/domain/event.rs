//! Change events broadcast to WebSocket subscribers.
//!
//! Every successful content mutation publishes a [`ContentEvent`] through
//! the [`crate::ws::ChangeBroadcaster`]. Events serialize as
//! `{"type": "...", "data": {...}}` frames. They are a notification hint,
//! not a log: nothing is persisted or replayed for disconnected clients.

use serde::Serialize;
use uuid::Uuid;

use super::{DashboardStats, Emotion, Verse, VerseInteraction};

/// A content-change notification pushed to realtime subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ContentEvent {
    /// A verse was created; carries the full new verse.
    VerseCreated(Verse),
    /// A verse was updated; carries the post-update verse.
    VerseUpdated(Verse),
    /// A verse was soft-deleted.
    VerseDeleted {
        /// Identifier of the deleted verse.
        id: Uuid,
    },
    /// An emotion was created; carries the full new emotion.
    EmotionCreated(Emotion),
    /// An emotion was updated; carries the post-update emotion.
    EmotionUpdated(Emotion),
    /// An emotion was soft-deleted.
    EmotionDeleted {
        /// Identifier of the deleted emotion.
        id: Uuid,
    },
    /// An interaction was recorded (admin audience only).
    NewInteraction(VerseInteraction),
    /// Recomputed dashboard snapshot (admin audience only).
    StatsUpdate(DashboardStats),
}

impl ContentEvent {
    /// Returns the wire `type` tag as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::VerseCreated(_) => "verse_created",
            Self::VerseUpdated(_) => "verse_updated",
            Self::VerseDeleted { .. } => "verse_deleted",
            Self::EmotionCreated(_) => "emotion_created",
            Self::EmotionUpdated(_) => "emotion_updated",
            Self::EmotionDeleted { .. } => "emotion_deleted",
            Self::NewInteraction(_) => "new_interaction",
            Self::StatsUpdate(_) => "stats_update",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewEmotion, NewVerse};

    fn make_verse() -> Verse {
        Verse::from_new(NewVerse {
            emotion: "peace".to_string(),
            sanskrit: "स".to_string(),
            hindi: "ह".to_string(),
            english: "e".to_string(),
            explanation: "x".to_string(),
            chapter: "Bhagavad Gita 6.27".to_string(),
        })
    }

    #[test]
    fn verse_created_frame_shape() {
        let verse = make_verse();
        let id = verse.id;
        let json = serde_json::to_value(ContentEvent::VerseCreated(verse)).unwrap_or_default();

        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("verse_created"));
        let data_id = json
            .get("data")
            .and_then(|d| d.get("id"))
            .and_then(|v| v.as_str())
            .map(ToString::to_string);
        assert_eq!(data_id, Some(id.to_string()));
    }

    #[test]
    fn deleted_frame_carries_only_id() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ContentEvent::VerseDeleted { id }).unwrap_or_default();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("verse_deleted"));
        assert_eq!(
            json.get("data").and_then(|d| d.get("id")).and_then(|v| v.as_str()),
            Some(id.to_string().as_str())
        );
    }

    #[test]
    fn event_type_str_matches_wire_tag() {
        let emotion = Emotion::from_new(NewEmotion {
            name: "calm".to_string(),
            display_name: "Calm".to_string(),
            description: "d".to_string(),
            color: "#000".to_string(),
            icon: "i".to_string(),
            emoji: "🙂".to_string(),
            sort_order: 0,
        });
        let event = ContentEvent::EmotionCreated(emotion);
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(
            json.get("type").and_then(|v| v.as_str()),
            Some(event.event_type_str())
        );
    }
}
