//! Domain layer: content entities and change events.
//!
//! This module contains the entities the gateway serves — verses, the
//! emotion taxonomy, administrators, and interaction analytics — plus the
//! [`ContentEvent`] enum broadcast to WebSocket subscribers after every
//! content mutation.

pub mod admin;
pub mod emotion;
pub mod event;
pub mod interaction;
pub mod verse;

pub use admin::{Admin, AdminProfile, NewAdmin};
pub use emotion::{Emotion, EmotionUpdate, NewEmotion};
pub use event::ContentEvent;
pub use interaction::{
    DashboardStats, EmotionCount, EmotionStat, NewInteraction, VerseInteraction,
};
pub use verse::{NewVerse, Verse, VerseUpdate};
