//! In-memory storage backend.
//!
//! A map-free, insertion-ordered store used when no `DATABASE_URL` is
//! configured. Semantics mirror the PostgreSQL backend exactly; the
//! `Vec`-backed collections make "creation order preserved" and the
//! first-seen tie-break in the popularity ranking natural.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Storage;
use crate::auth::password;
use crate::domain::{
    Admin, DashboardStats, Emotion, EmotionCount, EmotionStat, EmotionUpdate, NewAdmin,
    NewEmotion, NewInteraction, NewVerse, Verse, VerseInteraction, VerseUpdate,
};
use crate::error::ApiError;

#[derive(Debug, Default)]
struct MemoryState {
    verses: Vec<Verse>,
    emotions: Vec<Emotion>,
    admins: Vec<Admin>,
    interactions: Vec<VerseInteraction>,
    emotion_stats: Vec<EmotionStat>,
}

/// In-memory implementation of [`Storage`].
///
/// All collections live behind a single `tokio::sync::RwLock`; reads take
/// shared guards, mutations exclusive ones. Nothing here can fail with a
/// storage error, but the contract is kept identical to the durable
/// backend so the API layer stays backend-agnostic.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RwLock<MemoryState>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_updated_first(verses: &mut [Verse]) {
    verses.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_verses_by_emotion(&self, emotion: &str) -> Result<Vec<Verse>, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .verses
            .iter()
            .filter(|v| v.is_active && v.emotion == emotion)
            .cloned()
            .collect())
    }

    async fn get_random_verse_by_emotion(
        &self,
        emotion: &str,
    ) -> Result<Option<Verse>, ApiError> {
        let candidates = self.get_verses_by_emotion(emotion).await?;
        Ok(candidates.choose(&mut rand::thread_rng()).cloned())
    }

    async fn get_all_verses(&self) -> Result<Vec<Verse>, ApiError> {
        let state = self.state.read().await;
        let mut verses: Vec<Verse> = state.verses.iter().filter(|v| v.is_active).cloned().collect();
        newest_updated_first(&mut verses);
        Ok(verses)
    }

    async fn get_all_verses_for_admin(&self) -> Result<Vec<Verse>, ApiError> {
        let state = self.state.read().await;
        let mut verses = state.verses.clone();
        newest_updated_first(&mut verses);
        Ok(verses)
    }

    async fn get_verse_by_id(&self, id: Uuid) -> Result<Option<Verse>, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .verses
            .iter()
            .find(|v| v.id == id && v.is_active)
            .cloned())
    }

    async fn create_verse(&self, data: NewVerse) -> Result<Verse, ApiError> {
        let verse = Verse::from_new(data);
        let mut state = self.state.write().await;
        state.verses.push(verse.clone());
        Ok(verse)
    }

    async fn update_verse(
        &self,
        id: Uuid,
        update: VerseUpdate,
    ) -> Result<Option<Verse>, ApiError> {
        let mut state = self.state.write().await;
        // Soft-deleted verses stay addressable here: the update revives them.
        let Some(verse) = state.verses.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        verse.apply_update(update);
        Ok(Some(verse.clone()))
    }

    async fn delete_verse(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut state = self.state.write().await;
        let Some(verse) = state.verses.iter_mut().find(|v| v.id == id) else {
            return Ok(false);
        };
        verse.is_active = false;
        verse.updated_at = Utc::now();
        Ok(true)
    }

    async fn get_all_emotions(&self) -> Result<Vec<Emotion>, ApiError> {
        let state = self.state.read().await;
        let mut emotions: Vec<Emotion> =
            state.emotions.iter().filter(|e| e.is_active).cloned().collect();
        emotions.sort_by_key(|e| e.sort_order);
        Ok(emotions)
    }

    async fn get_emotion_by_id(&self, id: Uuid) -> Result<Option<Emotion>, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .emotions
            .iter()
            .find(|e| e.id == id && e.is_active)
            .cloned())
    }

    async fn get_emotion_by_name(&self, name: &str) -> Result<Option<Emotion>, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .emotions
            .iter()
            .find(|e| e.name == name && e.is_active)
            .cloned())
    }

    async fn create_emotion(&self, data: NewEmotion) -> Result<Emotion, ApiError> {
        let emotion = Emotion::from_new(data);
        let mut state = self.state.write().await;
        state.emotions.push(emotion.clone());
        Ok(emotion)
    }

    async fn update_emotion(
        &self,
        id: Uuid,
        update: EmotionUpdate,
    ) -> Result<Option<Emotion>, ApiError> {
        let mut state = self.state.write().await;
        // Inactive emotions are not found and not revived.
        let Some(emotion) = state.emotions.iter_mut().find(|e| e.id == id && e.is_active)
        else {
            return Ok(None);
        };
        emotion.apply_update(update);
        Ok(Some(emotion.clone()))
    }

    async fn delete_emotion(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut state = self.state.write().await;
        let Some(emotion) = state.emotions.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        emotion.is_active = false;
        emotion.updated_at = Utc::now();
        Ok(true)
    }

    async fn create_admin(&self, data: NewAdmin) -> Result<Admin, ApiError> {
        let password_hash = password::hash_password(&data.password)?;
        let admin = Admin {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash,
            role: data.role.unwrap_or_else(|| "admin".to_string()),
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        };
        let mut state = self.state.write().await;
        state.admins.push(admin.clone());
        Ok(admin)
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .admins
            .iter()
            .find(|a| a.username == username && a.is_active)
            .cloned())
    }

    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError> {
        let state = self.state.read().await;
        Ok(state
            .admins
            .iter()
            .find(|a| a.email == email && a.is_active)
            .cloned())
    }

    async fn update_admin_last_login(&self, id: Uuid) -> Result<(), ApiError> {
        let mut state = self.state.write().await;
        if let Some(admin) = state.admins.iter_mut().find(|a| a.id == id) {
            admin.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn record_interaction(
        &self,
        data: NewInteraction,
    ) -> Result<VerseInteraction, ApiError> {
        let interaction = VerseInteraction::from_new(data);
        let mut state = self.state.write().await;
        state.interactions.push(interaction.clone());
        Ok(interaction)
    }

    async fn get_verse_interactions(
        &self,
        limit: usize,
    ) -> Result<Vec<VerseInteraction>, ApiError> {
        let state = self.state.read().await;
        // Append-only, so reverse insertion order is newest first.
        Ok(state.interactions.iter().rev().take(limit).cloned().collect())
    }

    async fn get_emotion_stats(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<EmotionStat>, ApiError> {
        let state = self.state.read().await;
        let mut stats: Vec<EmotionStat> = state
            .emotion_stats
            .iter()
            .filter(|s| start.is_none_or(|from| s.date >= from))
            .filter(|s| end.is_none_or(|to| s.date <= to))
            .cloned()
            .collect();
        stats.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(stats)
    }

    async fn get_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let state = self.state.read().await;

        let total_verses = state.verses.iter().filter(|v| v.is_active).count() as u64;
        let total_interactions = state.interactions.len() as u64;

        // Count per emotion in first-seen order so equal counts keep a
        // stable rank.
        let mut counts: Vec<EmotionCount> = Vec::new();
        for interaction in &state.interactions {
            match counts.iter_mut().find(|c| c.emotion == interaction.emotion) {
                Some(entry) => entry.count += 1,
                None => counts.push(EmotionCount {
                    emotion: interaction.emotion.clone(),
                    count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(5);

        let recent_interactions: Vec<VerseInteraction> =
            state.interactions.iter().rev().take(10).cloned().collect();

        Ok(DashboardStats {
            total_verses,
            total_interactions,
            popular_emotions: counts,
            recent_interactions,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn verse(emotion: &str, english: &str) -> NewVerse {
        NewVerse {
            emotion: emotion.to_string(),
            sanskrit: "स".to_string(),
            hindi: "ह".to_string(),
            english: english.to_string(),
            explanation: "x".to_string(),
            chapter: "Bhagavad Gita 1.1".to_string(),
        }
    }

    fn emotion(name: &str, sort_order: i32) -> NewEmotion {
        NewEmotion {
            name: name.to_string(),
            display_name: name.to_string(),
            description: "d".to_string(),
            color: "#fff".to_string(),
            icon: "i".to_string(),
            emoji: "🙂".to_string(),
            sort_order,
        }
    }

    #[tokio::test]
    async fn verses_by_emotion_filters_active_and_tag() {
        let store = MemoryStorage::new();
        let kept = store.create_verse(verse("happy", "a")).await.unwrap_or_else(|_| panic!());
        let _other = store.create_verse(verse("sad", "b")).await;
        let dropped = store.create_verse(verse("happy", "c")).await.unwrap_or_else(|_| panic!());
        assert!(store.delete_verse(dropped.id).await.unwrap_or(false));

        let found = store.get_verses_by_emotion("happy").await.unwrap_or_default();
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|v| v.id), Some(kept.id));
    }

    #[tokio::test]
    async fn random_pick_stays_inside_the_emotion_and_covers_it() {
        let store = MemoryStorage::new();
        let mut ids = HashSet::new();
        for i in 0..3 {
            let v = store
                .create_verse(verse("happy", &format!("v{i}")))
                .await
                .unwrap_or_else(|_| panic!());
            ids.insert(v.id);
        }
        let _noise = store.create_verse(verse("sad", "noise")).await;

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let picked = store
                .get_random_verse_by_emotion("happy")
                .await
                .unwrap_or_default();
            let Some(picked) = picked else {
                panic!("expected a verse");
            };
            assert!(ids.contains(&picked.id));
            seen.insert(picked.id);
        }
        // 200 uniform draws over 3 verses miss one with probability ~1e-35.
        assert_eq!(seen, ids);
    }

    #[tokio::test]
    async fn random_pick_absent_when_no_active_verses() {
        let store = MemoryStorage::new();
        let v = store.create_verse(verse("lonely", "a")).await.unwrap_or_else(|_| panic!());
        assert!(store.delete_verse(v.id).await.unwrap_or(false));

        let picked = store
            .get_random_verse_by_emotion("lonely")
            .await
            .unwrap_or_default();
        assert!(picked.is_none());
    }

    #[tokio::test]
    async fn soft_delete_hides_from_public_but_not_admin() {
        let store = MemoryStorage::new();
        let v = store.create_verse(verse("peace", "a")).await.unwrap_or_else(|_| panic!());
        assert!(store.delete_verse(v.id).await.unwrap_or(false));

        assert!(store.get_all_verses().await.unwrap_or_default().is_empty());
        assert!(store.get_verse_by_id(v.id).await.unwrap_or_default().is_none());

        let admin_view = store.get_all_verses_for_admin().await.unwrap_or_default();
        assert_eq!(admin_view.len(), 1);
        assert!(admin_view.first().is_some_and(|row| !row.is_active));
    }

    #[tokio::test]
    async fn update_revives_soft_deleted_verse_idempotently() {
        let store = MemoryStorage::new();
        let v = store.create_verse(verse("angry", "a")).await.unwrap_or_else(|_| panic!());
        assert!(store.delete_verse(v.id).await.unwrap_or(false));

        let update = VerseUpdate {
            english: Some("b".to_string()),
            ..VerseUpdate::default()
        };
        let first = store
            .update_verse(v.id, update.clone())
            .await
            .unwrap_or_default();
        let second = store.update_verse(v.id, update).await.unwrap_or_default();

        let (Some(first), Some(second)) = (first, second) else {
            panic!("expected both updates to find the verse");
        };
        assert!(first.is_active && second.is_active);
        assert_eq!(first.english, second.english);
    }

    #[tokio::test]
    async fn missing_verse_update_and_delete_signal_not_found() {
        let store = MemoryStorage::new();
        let id = Uuid::new_v4();
        assert!(store
            .update_verse(id, VerseUpdate::default())
            .await
            .unwrap_or_default()
            .is_none());
        assert!(!store.delete_verse(id).await.unwrap_or(true));
    }

    #[tokio::test]
    async fn emotions_sorted_by_sort_order_and_active_only() {
        let store = MemoryStorage::new();
        let _b = store.create_emotion(emotion("b", 2)).await;
        let a = store.create_emotion(emotion("a", 1)).await.unwrap_or_else(|_| panic!());
        let gone = store.create_emotion(emotion("gone", 0)).await.unwrap_or_else(|_| panic!());
        assert!(store.delete_emotion(gone.id).await.unwrap_or(false));

        let listed = store.get_all_emotions().await.unwrap_or_default();
        assert_eq!(
            listed.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(listed.first().map(|e| e.id), Some(a.id));
    }

    #[tokio::test]
    async fn name_lookup_frees_after_soft_delete() {
        let store = MemoryStorage::new();
        let first = store.create_emotion(emotion("calm", 1)).await.unwrap_or_else(|_| panic!());
        assert!(store.get_emotion_by_name("calm").await.unwrap_or_default().is_some());

        assert!(store.delete_emotion(first.id).await.unwrap_or(false));
        assert!(store.get_emotion_by_name("calm").await.unwrap_or_default().is_none());

        // The name is reusable now.
        let second = store.create_emotion(emotion("calm", 1)).await.unwrap_or_else(|_| panic!());
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn inactive_emotion_is_not_updatable() {
        let store = MemoryStorage::new();
        let e = store.create_emotion(emotion("calm", 1)).await.unwrap_or_else(|_| panic!());
        assert!(store.delete_emotion(e.id).await.unwrap_or(false));

        let result = store
            .update_emotion(
                e.id,
                EmotionUpdate {
                    display_name: Some("Calmer".to_string()),
                    ..EmotionUpdate::default()
                },
            )
            .await
            .unwrap_or_default();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn admin_roundtrip_and_password_verification() {
        let store = MemoryStorage::new();
        let created = store
            .create_admin(NewAdmin {
                username: "keeper".to_string(),
                email: "keeper@example.com".to_string(),
                password: "opensesame".to_string(),
                role: None,
            })
            .await
            .unwrap_or_else(|_| panic!());

        assert_ne!(created.password_hash, "opensesame");
        assert_eq!(created.role, "admin");
        assert!(created.last_login_at.is_none());

        let fetched = store
            .get_admin_by_username("keeper")
            .await
            .unwrap_or_default();
        let Some(fetched) = fetched else {
            panic!("admin should be found");
        };
        assert!(store
            .verify_admin_password("opensesame", &fetched.password_hash)
            .unwrap_or(false));
        assert!(!store
            .verify_admin_password("wrong", &fetched.password_hash)
            .unwrap_or(true));

        store
            .update_admin_last_login(created.id)
            .await
            .unwrap_or_else(|_| panic!());
        let after = store
            .get_admin_by_username("keeper")
            .await
            .unwrap_or_default();
        assert!(after.is_some_and(|a| a.last_login_at.is_some()));
    }

    #[tokio::test]
    async fn dashboard_counts_and_popularity_ranking() {
        let store = MemoryStorage::new();
        let v = store.create_verse(verse("happy", "a")).await.unwrap_or_else(|_| panic!());
        let hidden = store.create_verse(verse("sad", "b")).await.unwrap_or_else(|_| panic!());
        assert!(store.delete_verse(hidden.id).await.unwrap_or(false));

        for emotion_name in ["happy", "happy", "sad", "peace", "peace", "peace"] {
            store
                .record_interaction(NewInteraction {
                    verse_id: v.id,
                    emotion: emotion_name.to_string(),
                    action: "viewed".to_string(),
                    session_id: None,
                    user_agent: None,
                    ip_address: None,
                })
                .await
                .unwrap_or_else(|_| panic!());
        }

        let stats = store.get_dashboard_stats().await.unwrap_or_else(|_| panic!());
        assert_eq!(stats.total_verses, 1); // only active verses count
        assert_eq!(stats.total_interactions, 6);
        assert_eq!(
            stats
                .popular_emotions
                .iter()
                .map(|c| (c.emotion.as_str(), c.count))
                .collect::<Vec<_>>(),
            vec![("peace", 3), ("happy", 2), ("sad", 1)]
        );
        assert_eq!(stats.recent_interactions.len(), 6);
        // Newest first.
        assert_eq!(
            stats.recent_interactions.first().map(|i| i.emotion.as_str()),
            Some("peace")
        );
    }

    #[tokio::test]
    async fn interactions_respect_limit() {
        let store = MemoryStorage::new();
        let verse_id = Uuid::new_v4();
        for i in 0..5 {
            store
                .record_interaction(NewInteraction {
                    verse_id,
                    emotion: format!("e{i}"),
                    action: "viewed".to_string(),
                    session_id: None,
                    user_agent: None,
                    ip_address: None,
                })
                .await
                .unwrap_or_else(|_| panic!());
        }
        let latest = store.get_verse_interactions(2).await.unwrap_or_default();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest.first().map(|i| i.emotion.as_str()), Some("e4"));
    }
}
