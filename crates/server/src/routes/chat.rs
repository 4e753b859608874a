use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use futures::StreamExt;
use serde::Deserialize;
use service::auth::Identity;
use service::chat::domain::ChatMessage;
use service::errors::ServiceError;
use service::realtime::Subscription;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::{JsonBody, PathParam};
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub text: String,
}

#[utoipa::path(post, path = "/api/bookings/{id}/messages", tag = "chat", params(("id" = Uuid, Path, description = "Booking id")),
    request_body = crate::openapi::SendMessageDoc,
    responses((status = 201, description = "Sent"), (status = 403, description = "Not a participant")))]
pub async fn send_message(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(booking_id), _): PathParam<Uuid>,
    WithRejection(Json(input), _): JsonBody<SendMessage>,
) -> Result<(StatusCode, Json<ChatMessage>), JsonApiError> {
    let message = state.market.chat.send_message(&identity, booking_id, &input.text).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(get, path = "/api/bookings/{id}/messages", tag = "chat", params(("id" = Uuid, Path, description = "Booking id")),
    responses((status = 200, description = "Oldest first"), (status = 403, description = "Not a participant")))]
pub async fn list_messages(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(booking_id), _): PathParam<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, JsonApiError> {
    Ok(Json(state.market.chat.list_messages(&identity, booking_id).await?))
}

/// Live chat room for one booking. Text frames from the client are sent as
/// messages; every message on the booking is pushed back as JSON.
pub async fn chat_ws(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(booking_id), _): PathParam<Uuid>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, JsonApiError> {
    let receiver = state.market.chat.subscribe(&identity, booking_id).await?;
    info!(booking_id = %booking_id, uid = %identity.uid, "chat websocket requested");
    Ok(ws.on_upgrade(move |socket| handle_chat_socket(state, socket, identity, booking_id, receiver)))
}

/// Same `{ "error", "detail" }` body the HTTP routes return.
fn error_frame(e: ServiceError) -> String {
    serde_json::to_string(&JsonApiError::from(e)).unwrap_or_else(|_| r#"{"error":"Internal Server Error"}"#.to_string())
}

async fn handle_chat_socket(
    state: ServerState,
    mut socket: WebSocket,
    identity: Identity,
    booking_id: Uuid,
    mut receiver: Subscription<ChatMessage>,
) {
    loop {
        tokio::select! {
            incoming = socket.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = state.market.chat.send_message(&identity, booking_id, &text).await {
                            if socket.send(Message::Text(error_frame(e))).await.is_err() {
                                return;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(booking_id = %booking_id, uid = %identity.uid, "chat websocket closed");
                        return;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("chat websocket error: {}", e);
                        return;
                    }
                }
            }
            result = receiver.recv() => {
                match result {
                    Ok(message) => {
                        let json = match serde_json::to_string(&message) {
                            Ok(json) => json,
                            Err(e) => {
                                error!("failed to serialize chat message: {}", e);
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json)).await.is_err() {
                            return;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(booking_id = %booking_id, skipped, "chat receiver lagged");
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_frames_match_http_error_bodies() {
        let frame: serde_json::Value = serde_json::from_str(&error_frame(ServiceError::Validation("message text required".into()))).unwrap();
        assert_eq!(frame, serde_json::json!({ "error": "Validation Error", "detail": "message text required" }));
    }
}
