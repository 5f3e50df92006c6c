//! Live notification feed over the `/ws` socket

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest},
};
use tracing::{debug, warn};

use crate::{
    client::ApiClient,
    error::{ClientError, ClientResult},
    models::Notification,
};

#[derive(Debug, Deserialize)]
struct ServerFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

pub struct NotificationStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl NotificationStream {
    /// Open the socket for the client's current session
    pub async fn connect(client: &ApiClient) -> ClientResult<Self> {
        let token = client
            .tokens()
            .get()
            .ok_or(ClientError::SessionExpired)?;

        let mut url = client.base_url().join("ws").map_err(|e| {
            ClientError::Configuration(e.to_string())
        })?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| ClientError::Configuration(format!("cannot use {scheme} for {url}")))?;
        url.query_pairs_mut().append_pair("token", &token);

        let request = url.as_str().into_client_request()?;
        let (socket, _) = connect_async(request).await?;
        debug!("Notification stream connected");
        Ok(Self { socket })
    }

    /// Next pushed notification; `None` once the server closes the socket
    pub async fn next(&mut self) -> Option<ClientResult<Notification>> {
        while let Some(frame) = self.socket.next().await {
            let text = match frame {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            };

            let frame: ServerFrame = match serde_json::from_str(&text) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Ignoring malformed frame: {}", e);
                    continue;
                }
            };
            match frame.event.as_str() {
                "new_notification" => {
                    return Some(serde_json::from_value(frame.data).map_err(Into::into));
                }
                other => debug!("Ignoring {} frame", other),
            }
        }
        None
    }

    /// Keep-alive; the server answers with a pong frame
    pub async fn ping(&mut self) -> ClientResult<()> {
        let frame = serde_json::json!({ "event": "ping" }).to_string();
        self.socket.send(Message::Text(frame)).await?;
        Ok(())
    }

    pub async fn close(mut self) -> ClientResult<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}
