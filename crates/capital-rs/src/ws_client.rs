use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt, stream};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::http;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info};

use crate::errors::CapitalError;
use crate::transport::AuthTokens;
use crate::websocket::models::CapitalSocketMessage;

type WsSink = stream::SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Single-connection streaming client.
///
/// The stream authenticates per message, so the client holds a copy of the
/// session tokens and stamps them on every outbound envelope. There is no
/// reconnect and no subscription bookkeeping: after a disconnect, build a
/// new client from fresh credentials.
pub struct CapitalWebsocketClient {
    url: String,
    sender: Mutex<Option<WsSink>>,
    receiver: Mutex<Option<WsStream>>,
    correlation_id: AtomicU64,
    credentials: std::sync::Mutex<AuthTokens>,
}

impl std::fmt::Debug for CapitalWebsocketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapitalWebsocketClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl CapitalWebsocketClient {
    pub fn new(url: impl Into<String>, credentials: AuthTokens) -> Self {
        CapitalWebsocketClient {
            url: url.into(),
            sender: Mutex::new(None),
            receiver: Mutex::new(None),
            correlation_id: AtomicU64::new(0),
            credentials: std::sync::Mutex::new(credentials),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Next outbound correlation id, starting at 1
    pub(crate) fn get_correlation_id(&self) -> u64 {
        self.correlation_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn credentials(&self) -> AuthTokens {
        self.credentials
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Swap in rotated tokens, e.g. after switching account.
    pub fn update_credentials(&self, credentials: AuthTokens) {
        let mut lock = self.credentials.lock().unwrap_or_else(|e| e.into_inner());
        *lock = credentials;
    }

    pub async fn connect(&self) -> Result<(), CapitalError> {
        let (ws_stream, response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| CapitalError::generic(format!("error forming ws connection: {e}")))?;
        if response.status() != http::StatusCode::SWITCHING_PROTOCOLS {
            return Err(CapitalError::generic(format!(
                "not switching protocols, failed with status code: {:?}",
                response.status()
            )));
        }
        let (sender, receiver) = ws_stream.split();
        *self.sender.lock().await = Some(sender);
        *self.receiver.lock().await = Some(receiver);
        info!(url = %self.url, "websocket connected");
        Ok(())
    }

    pub async fn is_connected(&self) -> bool {
        self.sender.lock().await.is_some()
    }

    pub async fn send_message(&self, message: String) -> Result<(), CapitalError> {
        let mut lock = self.sender.lock().await;
        let Some(sender) = lock.as_mut() else {
            return Err(CapitalError::generic(
                "`sender` field is none. call connect method first",
            ));
        };
        debug!(len = message.len(), "websocket send");
        sender
            .send(Message::text(message))
            .await
            .map_err(|e| CapitalError::generic(format!("websocket send failed: {e}")))
    }

    async fn next_unparsed_message(&self) -> Result<Message, CapitalError> {
        let mut lock = self.receiver.lock().await;
        let Some(receiver) = lock.as_mut() else {
            return Err(CapitalError::generic(
                "`receiver` field is none. call connect method first",
            ));
        };
        match receiver.next().await {
            Some(res) => res.map_err(|e| CapitalError::generic(format!("{e}"))),
            None => Err(CapitalError::generic("websocket stream ended")),
        }
    }

    pub async fn next_message(&self) -> Result<CapitalSocketMessage, CapitalError> {
        let message = self.next_unparsed_message().await?;
        CapitalSocketMessage::try_from(message)
    }

    /// Send a close frame and drop the connection. Safe to call twice.
    ///
    /// A reader parked in [`next_message`](Self::next_message) keeps the
    /// receiving half until it sees the server's close.
    pub async fn close(&self) -> Result<(), CapitalError> {
        let sender = self.sender.lock().await.take();
        if let Ok(mut receiver) = self.receiver.try_lock() {
            receiver.take();
        }
        if let Some(mut sender) = sender {
            sender
                .close()
                .await
                .map_err(|e| CapitalError::generic(format!("websocket close failed: {e}")))?;
            info!(url = %self.url, "websocket closed");
        }
        Ok(())
    }
}
