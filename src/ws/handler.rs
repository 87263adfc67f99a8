//! Axum WebSocket upgrade handler.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::broadcaster::Audience;
use super::connection::run_connection;
use crate::app_state::AppState;

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// `?admin=true` joins the admin audience; anything else is public.
    #[serde(default)]
    pub admin: bool,
}

/// `GET /ws` — Upgrade to WebSocket and subscribe to one audience.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let audience = if params.admin {
        Audience::Admin
    } else {
        Audience::Public
    };
    let event_rx = state.broadcaster.subscribe(audience);
    tracing::debug!(?audience, "ws connection established");

    ws.on_upgrade(move |socket| run_connection(socket, event_rx, audience))
}
