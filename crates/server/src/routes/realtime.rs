use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Extension,
};
use futures::StreamExt;
use service::auth::Identity;
use service::realtime::{Notification, Subscription};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::state::ServerState;

/// Stream the caller's notifications as JSON text frames.
pub async fn notifications_ws(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let receiver = state.market.hub.subscribe_notifications(&identity.uid);
    info!(uid = %identity.uid, "notification websocket requested");
    ws.on_upgrade(move |socket| handle_notification_socket(socket, identity, receiver))
}

async fn handle_notification_socket(
    mut socket: WebSocket,
    identity: Identity,
    mut receiver: Subscription<Notification>,
) {
    loop {
        tokio::select! {
            incoming = socket.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        info!(uid = %identity.uid, "notification websocket closed");
                        return;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("notification websocket error: {}", e);
                        return;
                    }
                }
            }
            result = receiver.recv() => {
                match result {
                    Ok(notification) => {
                        let json = match serde_json::to_string(&notification) {
                            Ok(json) => json,
                            Err(e) => {
                                error!("failed to serialize notification: {}", e);
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json)).await.is_err() {
                            return;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(uid = %identity.uid, skipped, "notification receiver lagged");
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        }
    }
}
