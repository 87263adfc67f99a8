//! Broadcast fan-out for content change events.
//!
//! [`ChangeBroadcaster`] wraps two [`tokio::sync::broadcast`] channels, one
//! per subscriber audience. It is constructed once by the composition root
//! and injected through [`crate::app_state::AppState`] — never a
//! module-level singleton — so tests instantiate isolated broadcasters.

use tokio::sync::broadcast;

use crate::domain::ContentEvent;

/// Which subscriber set a connection belongs to, decided once at upgrade
/// time by the `admin` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Admin-console subscribers; additionally receive interaction and
    /// stats events.
    Admin,
    /// Public-site subscribers.
    Public,
}

/// Best-effort fan-out of [`ContentEvent`]s to realtime subscribers.
///
/// Fire-and-forget: a publish with no subscribers is silently dropped, a
/// lagging subscriber loses the oldest events, and nothing is persisted or
/// replayed. At-most-once, no ordering contract across connections.
#[derive(Debug, Clone)]
pub struct ChangeBroadcaster {
    admin: broadcast::Sender<ContentEvent>,
    public: broadcast::Sender<ContentEvent>,
}

impl ChangeBroadcaster {
    /// Creates a broadcaster whose per-audience channels buffer `capacity`
    /// events for slow receivers.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (admin, _) = broadcast::channel(capacity);
        let (public, _) = broadcast::channel(capacity);
        Self { admin, public }
    }

    /// Publishes to admin-mode subscribers only. Returns the number of
    /// receivers the event reached.
    pub fn publish_to_admins(&self, event: ContentEvent) -> usize {
        let delivered = self.admin.send(event).unwrap_or(0);
        tracing::debug!(delivered, "broadcast to admins");
        delivered
    }

    /// Publishes to public-mode subscribers only. Returns the number of
    /// receivers the event reached.
    pub fn publish_to_public(&self, event: ContentEvent) -> usize {
        let delivered = self.public.send(event).unwrap_or(0);
        tracing::debug!(delivered, "broadcast to public");
        delivered
    }

    /// Publishes to both audiences. Returns the total number of receivers
    /// reached.
    pub fn publish_to_all(&self, event: ContentEvent) -> usize {
        self.publish_to_admins(event.clone()) + self.publish_to_public(event)
    }

    /// Subscribes a new connection to one audience. Each WebSocket
    /// connection calls this once on upgrade.
    #[must_use]
    pub fn subscribe(&self, audience: Audience) -> broadcast::Receiver<ContentEvent> {
        match audience {
            Audience::Admin => self.admin.subscribe(),
            Audience::Public => self.public.subscribe(),
        }
    }

    /// Current number of open subscriptions in one audience.
    #[must_use]
    pub fn receiver_count(&self, audience: Audience) -> usize {
        match audience {
            Audience::Admin => self.admin.receiver_count(),
            Audience::Public => self.public.receiver_count(),
        }
    }
}
