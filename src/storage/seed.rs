//! Default content inserted into an empty store at startup.
//!
//! Seeding is idempotent: each collection is only populated when it is
//! empty, so restarting against an existing database changes nothing.

use crate::config::GatewayConfig;
use crate::domain::{NewAdmin, NewEmotion, NewVerse};
use crate::error::ApiError;

use super::Storage;

/// The default emotion taxonomy.
#[must_use]
pub fn default_emotions() -> Vec<NewEmotion> {
    let entries = [
        ("happy", "Happy", "Feeling joyful, content, and full of positive energy", "#F59E0B", "😊"),
        ("peace", "Peace", "Seeking inner calm, tranquility, and serenity", "#3B82F6", "🕊️"),
        ("anxious", "Anxious", "Feeling worried, nervous, or uncertain about the future", "#F97316", "😰"),
        ("angry", "Angry", "Experiencing frustration, irritation, or strong displeasure", "#EF4444", "😠"),
        ("sad", "Sad", "Feeling down, sorrowful, or experiencing grief", "#8B5CF6", "😢"),
        ("protection", "Protection", "Seeking divine guidance, safety, and spiritual shelter", "#10B981", "🛡️"),
        ("lazy", "Lazy", "Feeling unmotivated, lethargic, or lacking energy", "#6B7280", "😴"),
        ("lonely", "Lonely", "Feeling isolated, disconnected, or in need of companionship", "#EC4899", "😞"),
    ];
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, display_name, description, color, emoji))| NewEmotion {
            name: name.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            color: color.to_string(),
            icon: emoji.to_string(),
            emoji: emoji.to_string(),
            sort_order: i32::try_from(i).unwrap_or(0) + 1,
        })
        .collect()
}

/// Starter verses, one per common emotion.
#[must_use]
pub fn default_verses() -> Vec<NewVerse> {
    let entries = [
        (
            "happy",
            "योगस्थः कुरु कर्माणि सङ्गं त्यक्त्वा धनञ्जय।",
            "हे अर्जुन! आसक्ति को त्यागकर योग में स्थित हुआ कर्तव्य कर्मों को कर।",
            "Perform your duty equipoised, O Arjuna, abandoning all attachment to success or failure.",
            "When you feel happy, use this positive energy mindfully. True happiness comes from performing your duties without attachment to results.",
            "Bhagavad Gita 2.48",
        ),
        (
            "peace",
            "प्रशान्तमनसं ह्येनं योगिनं सुखमुत्तमम्।",
            "शांत मन वाले योगी को उत्तम सुख प्राप्त होता है।",
            "The yogi whose mind is peaceful attains the highest bliss.",
            "True peace is found in inner calm and spiritual connection. Seek stillness within.",
            "Bhagavad Gita 6.27",
        ),
        (
            "anxious",
            "सुखदुःखे समे कृत्वा लाभालाभौ जयाजयौ।",
            "सुख-दुःख, लाभ-हानि को समान समझकर कर्म कर।",
            "Treating pleasure and pain, gain and loss, victory and defeat alike, engage in action.",
            "When anxious, remember that all experiences are temporary. Maintain equanimity.",
            "Bhagavad Gita 2.38",
        ),
        (
            "angry",
            "क्रोधाद्भवति सम्मोहः सम्मोहात्स्मृतिविभ्रमः।",
            "क्रोध से मोह उत्पन्न होता है, मोह से स्मृति का नाश हो जाता है।",
            "From anger, complete delusion arises, and from delusion bewilderment of memory.",
            "When angry, step back and breathe. Anger clouds judgment and wisdom.",
            "Bhagavad Gita 2.63",
        ),
    ];
    entries
        .into_iter()
        .map(|(emotion, sanskrit, hindi, english, explanation, chapter)| NewVerse {
            emotion: emotion.to_string(),
            sanskrit: sanskrit.to_string(),
            hindi: hindi.to_string(),
            english: english.to_string(),
            explanation: explanation.to_string(),
            chapter: chapter.to_string(),
        })
        .collect()
}

/// Populates empty collections with the defaults and ensures the default
/// admin account exists.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] if the backing store is unreachable.
pub async fn ensure_seed_data(
    storage: &dyn Storage,
    config: &GatewayConfig,
) -> Result<(), ApiError> {
    if storage.get_all_emotions().await?.is_empty() {
        let emotions = default_emotions();
        let count = emotions.len();
        for emotion in emotions {
            storage.create_emotion(emotion).await?;
        }
        tracing::info!(count, "seeded default emotions");
    }

    if storage.get_all_verses_for_admin().await?.is_empty() {
        let verses = default_verses();
        let count = verses.len();
        for verse in verses {
            storage.create_verse(verse).await?;
        }
        tracing::info!(count, "seeded default verses");
    }

    if storage
        .get_admin_by_username(&config.seed_admin_username)
        .await?
        .is_none()
    {
        storage
            .create_admin(NewAdmin {
                username: config.seed_admin_username.clone(),
                email: config.seed_admin_email.clone(),
                password: config.seed_admin_password.clone(),
                role: None,
            })
            .await?;
        tracing::info!(username = %config.seed_admin_username, "seeded default admin");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap_or_else(|_| panic!()),
            database_url: None,
            database_max_connections: 1,
            database_connect_timeout_secs: 1,
            session_ttl_hours: 24,
            broadcast_capacity: 16,
            seed_on_startup: true,
            seed_admin_username: "admin".to_string(),
            seed_admin_email: "admin@example.com".to_string(),
            seed_admin_password: "admin123".to_string(),
        }
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStorage::new();
        let config = test_config();

        ensure_seed_data(&store, &config).await.unwrap_or_else(|_| panic!());
        let emotions_once = store.get_all_emotions().await.unwrap_or_default().len();
        let verses_once = store.get_all_verses().await.unwrap_or_default().len();
        assert_eq!(emotions_once, 8);
        assert_eq!(verses_once, 4);

        ensure_seed_data(&store, &config).await.unwrap_or_else(|_| panic!());
        assert_eq!(store.get_all_emotions().await.unwrap_or_default().len(), emotions_once);
        assert_eq!(store.get_all_verses().await.unwrap_or_default().len(), verses_once);
    }

    #[tokio::test]
    async fn every_seed_verse_targets_a_seed_emotion() {
        let names: Vec<String> = default_emotions().into_iter().map(|e| e.name).collect();
        for verse in default_verses() {
            assert!(names.contains(&verse.emotion), "orphan emotion {}", verse.emotion);
        }
    }

    #[tokio::test]
    async fn default_admin_can_log_in() {
        let store = MemoryStorage::new();
        let config = test_config();
        ensure_seed_data(&store, &config).await.unwrap_or_else(|_| panic!());

        let admin = store
            .get_admin_by_username("admin")
            .await
            .unwrap_or_default();
        let Some(admin) = admin else {
            panic!("default admin missing");
        };
        assert!(store
            .verify_admin_password("admin123", &admin.password_hash)
            .unwrap_or(false));
    }
}
