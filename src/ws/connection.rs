//! Per-connection forwarding loop.
//!
//! The protocol is server-to-client only: incoming frames are read solely
//! to notice close, and every matching [`ContentEvent`] is serialized and
//! pushed. A failed send or a client close tears the connection down; the
//! dropped receiver removes it from the audience set.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::broadcaster::Audience;
use crate::domain::ContentEvent;

/// Runs the write loop for a single WebSocket connection until the client
/// disconnects or the broadcaster shuts down.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<ContentEvent>,
    audience: Audience,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frames: only close matters, the rest are ignored.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(content_event) => {
                        let Ok(json) = serde_json::to_string(&content_event) else {
                            tracing::error!(
                                event_type = content_event.event_type_str(),
                                "failed to serialize event"
                            );
                            continue;
                        };
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // No replay: the client will re-fetch on its next
                        // interaction, so just note the gap.
                        tracing::warn!(missed, ?audience, "ws client lagged behind broadcaster");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!(?audience, "ws connection closed");
}
