//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::storage::Storage;
use crate::ws::ChangeBroadcaster;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Storage backend behind the uniform contract.
    pub storage: Arc<dyn Storage>,
    /// Fan-out for content change events.
    pub broadcaster: ChangeBroadcaster,
    /// Admin session records.
    pub sessions: SessionStore,
}
