//! Live notification socket
//!
//! Clients connect to `/ws?token=<jwt>` and receive
//! `{"event":"new_notification","data":...}` frames for their own user.
//! A text frame `{"event":"ping"}` is answered with `{"event":"pong"}`.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{AppQuery, authenticate},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientFrame {
    event: String,
}

pub async fn notifications_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<WsParams>,
) -> ApiResult<Response> {
    let token = params
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))?;
    let user = authenticate(&state, &token)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user.id)))
}

async fn handle_socket(socket: WebSocket, state: AppState, user: Uuid) {
    info!("Notification socket opened for {}", user);
    let mut notifications = state.hub.subscribe(user).await;
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let frame = match incoming {
                    Some(Ok(frame)) => frame,
                    Some(Err(e)) => {
                        debug!("Socket error for {}: {}", user, e);
                        break;
                    }
                    None => break,
                };
                match frame {
                    Message::Text(text) => {
                        let is_ping = serde_json::from_str::<ClientFrame>(&text)
                            .is_ok_and(|f| f.event == "ping");
                        if is_ping {
                            let pong = json!({ "event": "pong" }).to_string();
                            if sender.send(Message::Text(pong)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            pushed = notifications.recv() => {
                match pushed {
                    Ok(notification) => {
                        let frame = json!({
                            "event": "new_notification",
                            "data": notification.as_ref(),
                        });
                        if sender.send(Message::Text(frame.to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Socket of {} lagged, {} notifications skipped", user, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    drop(notifications);
    state.hub.release(user).await;
    info!("Notification socket closed for {}", user);
}
